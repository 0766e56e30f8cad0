use actix_multipart::form::MultipartForm;
use actix_web::{
    get, post,
    web::{Data, Path, ServiceConfig},
    HttpRequest, HttpResponse,
};

use super::models::{UploadForm, UploadKind, UploadResponse};
use super::service::UploadService;
use crate::api::auth::AuthUser;
use crate::api::error::ApiError;

#[post("/upload")]
async fn upload(
    req: HttpRequest,
    _user: AuthUser,
    uploads: Data<UploadService>,
    MultipartForm(form): MultipartForm<UploadForm>,
) -> Result<HttpResponse, ApiError> {
    let kind: UploadKind = form
        .kind
        .as_ref()
        .map(|k| k.as_str())
        .unwrap_or_default()
        .parse()
        .map_err(|_| ApiError::bad_request("Unknown upload type"))?;

    let stored = uploads.store(&form.file, kind).await?;

    let info = req.connection_info();
    let url = format!(
        "{}://{}/uploads/{}/{}",
        info.scheme(),
        info.host(),
        stored.kind.as_str(),
        stored.name
    );

    Ok(HttpResponse::Ok().json(UploadResponse {
        success: true,
        url,
        public_id: stored.name,
        file_name: form.file.file_name.clone(),
        size: form.file.size,
    }))
}

#[get("/uploads/{kind}/{file}")]
async fn download(
    uploads: Data<UploadService>,
    path: Path<(String, String)>,
) -> Result<HttpResponse, ApiError> {
    let (kind, file) = path.into_inner();
    let (bytes, mime) = uploads.read(&kind, &file).await?;
    Ok(HttpResponse::Ok().content_type(mime).body(bytes))
}

/// `POST /upload`, mounted under `/api`
pub fn upload_config(config: &mut ServiceConfig) {
    config.service(upload);
}

/// `GET /uploads/...`, mounted at the root
pub fn download_config(config: &mut ServiceConfig) {
    config.service(download);
}
