mod fs_photo_reader;

pub use fs_photo_reader::FsPhotoReader;
