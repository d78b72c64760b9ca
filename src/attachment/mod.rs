//! Attachment management for the expense tracker.
//!
//! Attachments are supporting files, such as receipt scans, stored as blobs
//! in the database alongside the transaction they belong to.

mod core;
mod delete_endpoint;
mod download_endpoint;
mod upload;

pub use core::{
    Attachment, NewAttachment, create_attachment, create_attachment_data_table,
    create_attachment_table, get_attachment, get_attachment_data,
    get_attachments_for_transaction,
};
pub use delete_endpoint::delete_attachment_endpoint;
pub use download_endpoint::download_attachment_endpoint;
pub use upload::{UploadedFile, read_uploaded_file, upload_attachments_endpoint};

pub(crate) use upload::is_empty_file_field;
