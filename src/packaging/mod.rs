mod archive;

pub use archive::archive_dir;
