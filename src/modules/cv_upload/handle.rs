use actix_multipart::Multipart;
use actix_web::{
    HttpRequest, HttpResponse, delete, get,
    http::header::{Charset, ContentDisposition, DispositionParam, DispositionType, ExtendedValue},
    post, web,
};
use futures_util::TryStreamExt;
use uuid::Uuid;

use crate::api::{error, success};
use crate::middlewares::get_claims;
use crate::modules::cv_upload::{schema::CvUploadResponse, service::CvUploadService};

#[post("/upload")]
pub async fn upload_cv(
    cv_service: web::Data<CvUploadService>,
    mut payload: Multipart,
    req: HttpRequest,
) -> Result<success::Success<CvUploadResponse>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let limit = cv_service.max_file_size();

    while let Some(mut field) =
        payload.try_next().await.map_err(|e| error::Error::bad_request(e.to_string()))?
    {
        let Some(filename) =
            field.content_disposition().and_then(|cd| cd.get_filename()).map(str::to_string)
        else {
            continue;
        };

        let mime_type = field
            .content_type()
            .map(|m| m.essence_str().to_string())
            .unwrap_or_else(|| mime_guess::from_path(&filename).first_or_octet_stream().to_string());

        // Stop buffering once past the limit; the service reports the size error.
        let mut bytes = Vec::new();
        while let Some(chunk) =
            field.try_next().await.map_err(|e| error::Error::bad_request(e.to_string()))?
        {
            bytes.extend_from_slice(&chunk);
            if bytes.len() > limit {
                break;
            }
        }

        let result = cv_service.upload_cv(user_id, filename, bytes, mime_type).await?;
        return Ok(success::Success::created(Some(result)).message("CV uploaded successfully"));
    }

    Err(error::Error::bad_request("No file found in request"))
}

#[get("/user/my-cvs")]
pub async fn list_my_cvs(
    cv_service: web::Data<CvUploadService>,
    req: HttpRequest,
) -> Result<success::Success<Vec<CvUploadResponse>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let cvs = cv_service.list_user_cvs(user_id).await?;
    Ok(success::Success::ok(Some(cvs)).message("CVs retrieved successfully"))
}

#[get("/{id:[0-9a-fA-F-]{36}}")]
pub async fn download_cv(
    cv_service: web::Data<CvUploadService>,
    cv_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<HttpResponse, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let (cv, bytes) = cv_service.read_cv(user_id, cv_id.into_inner()).await?;

    let disposition = attachment_disposition(&cv.original_filename);

    Ok(HttpResponse::Ok()
        .content_type(cv.mime_type)
        .insert_header(disposition)
        .body(bytes))
}

#[delete("/delete/{id:[0-9a-fA-F-]{36}}")]
pub async fn delete_cv(
    cv_service: web::Data<CvUploadService>,
    cv_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    cv_service.delete_cv(user_id, cv_id.into_inner()).await?;
    Ok(success::Success::no_content())
}

/// ASCII `filename` for old clients, plus RFC 5987 `filename*` when the name is not ASCII.
fn attachment_disposition(original_filename: &str) -> ContentDisposition {
    let fallback: String = original_filename
        .chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '_' })
        .collect();

    let mut parameters = vec![DispositionParam::Filename(fallback)];
    if !original_filename.is_ascii() {
        parameters.push(DispositionParam::FilenameExt(ExtendedValue {
            charset: Charset::Ext("UTF-8".to_string()),
            language_tag: None,
            value: original_filename.as_bytes().to_vec(),
        }));
    }

    ContentDisposition { disposition: DispositionType::Attachment, parameters }
}
