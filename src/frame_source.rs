pub mod impl_fake;
pub mod impl_image_files;
pub mod interface;
