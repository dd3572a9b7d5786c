pub mod upload;

pub use upload::{extract_multipart_upload, validate_file_size, UploadForm};
