pub mod analyzing_indicator;
pub mod header;
pub mod profile_form;
pub mod toast_list;
pub mod upload_area;
