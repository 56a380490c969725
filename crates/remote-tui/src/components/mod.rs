pub mod catalog_list;
pub mod header;
