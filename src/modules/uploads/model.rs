use serde::Serialize;
use utoipa::ToSchema;

use crate::modules::features::model::{Attachment, Feature};

/// Payload for a successful attachment upload: the newly stored files plus
/// the parent feature with its full attachment list.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadData {
    pub uploaded_files: Vec<Attachment>,
    pub feature: Feature,
}

/// An uploaded file pulled out of the multipart body before any
/// validation or persistence happens.
#[derive(Debug)]
pub struct IncomingFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}
