// Identity-document endpoints (guest verification flow).

use reqwest::multipart::Form;
use tracing::debug;

use crate::Error;
use crate::client::ApiClient;
use crate::types::{DocumentDto, UploadFile};

impl ApiClient {
    /// Upload a government ID card image.
    pub async fn upload_id_card(&self, file: &UploadFile) -> Result<DocumentDto, Error> {
        self.upload_document("api/documents/upload-id-card", file)
            .await
    }

    /// Upload a selfie photograph for identity matching.
    pub async fn upload_id_photograph(&self, file: &UploadFile) -> Result<DocumentDto, Error> {
        self.upload_document("api/documents/upload-id-photograph", file)
            .await
    }

    /// List the authenticated user's uploaded documents.
    pub async fn my_documents(&self) -> Result<Vec<DocumentDto>, Error> {
        self.get("api/documents/my-documents").await
    }

    async fn upload_document(&self, path: &str, file: &UploadFile) -> Result<DocumentDto, Error> {
        let url = self.url(path);
        debug!("POST {url} (multipart)");
        self.execute(move |http| {
            let form = Form::new().part("document", file.clone().into_part()?);
            Ok(http.post(url.clone()).multipart(form))
        })
        .await
    }
}
