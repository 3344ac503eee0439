pub mod google_maps;
pub mod records;
