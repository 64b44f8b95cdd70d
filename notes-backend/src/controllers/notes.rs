//! Notes REST API: CRUD with pagination and substring search.
//!
//! Every response uses the uniform envelope `{"data": ..., "error": ...}`
//! with exactly one side populated.

use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::db::DbError;
use crate::pagination::PageParams;
use crate::validators::{validate_note_payload, ValidationMode};
use crate::AppState;

const NOT_FOUND_MESSAGE: &str = "Note not found.";

fn ok_body(data: Value) -> Value {
    json!({ "data": data, "error": null })
}

fn err_body(message: &str) -> Value {
    json!({ "data": null, "error": { "message": message } })
}

fn bad_request(message: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(err_body(message))
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(err_body(NOT_FOUND_MESSAGE))
}

fn internal_error(e: DbError) -> HttpResponse {
    log::error!("Database error: {}", e);
    HttpResponse::InternalServerError().json(err_body("Internal server error."))
}

/// Missing or malformed request bodies behave like an empty object, so the
/// validator produces the error message instead of the framework.
fn payload_or_empty(body: Option<web::Json<Value>>) -> Value {
    body.map(|b| b.into_inner()).unwrap_or_else(|| json!({}))
}

// --- List notes ---

#[derive(Debug, Deserialize)]
struct ListNotesQuery {
    search: Option<String>,
    // Raw strings: malformed numbers fall back to defaults instead of a 400
    limit: Option<String>,
    offset: Option<String>,
}

async fn list_notes(
    data: web::Data<AppState>,
    query: web::Query<ListNotesQuery>,
) -> impl Responder {
    let page = PageParams::from_query(query.limit.as_deref(), query.offset.as_deref());

    match data.db.list_notes(query.search.as_deref(), page.limit, page.offset) {
        Ok((notes, total)) => {
            let items: Vec<_> = notes.iter().map(|n| n.to_representation()).collect();
            HttpResponse::Ok().json(ok_body(json!({
                "items": items,
                "limit": page.limit,
                "offset": page.offset,
                "total": total,
            })))
        }
        Err(e) => internal_error(e),
    }
}

// --- Create note ---

async fn create_note(
    data: web::Data<AppState>,
    body: Option<web::Json<Value>>,
) -> impl Responder {
    let payload = payload_or_empty(body);

    let fields = match validate_note_payload(&payload, ValidationMode::Create) {
        Ok(fields) => fields,
        Err(message) => return bad_request(&message),
    };

    // Create mode guarantees a title
    let title = fields.title.as_deref().unwrap_or_default();

    match data
        .db
        .create_note(title, fields.content.as_deref(), fields.tags.as_ref())
    {
        Ok(note) => HttpResponse::Created().json(ok_body(json!(note.to_representation()))),
        Err(e) => internal_error(e),
    }
}

// --- Get note ---

async fn get_note(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let Ok(id) = path.into_inner().parse::<i64>() else {
        return not_found();
    };

    match data.db.get_note(id) {
        Ok(Some(note)) => HttpResponse::Ok().json(ok_body(json!(note.to_representation()))),
        Ok(None) => not_found(),
        Err(e) => internal_error(e),
    }
}

// --- Update note ---

async fn update_note(
    data: web::Data<AppState>,
    path: web::Path<String>,
    body: Option<web::Json<Value>>,
) -> impl Responder {
    let Ok(id) = path.into_inner().parse::<i64>() else {
        return not_found();
    };

    // Look up first: an unknown id is a 404 even if the payload is invalid
    match data.db.get_note(id) {
        Ok(Some(_)) => {}
        Ok(None) => return not_found(),
        Err(e) => return internal_error(e),
    }

    let payload = payload_or_empty(body);
    let fields = match validate_note_payload(&payload, ValidationMode::Update) {
        Ok(fields) => fields,
        Err(message) => return bad_request(&message),
    };

    match data.db.update_note(id, &fields) {
        Ok(Some(note)) => HttpResponse::Ok().json(ok_body(json!(note.to_representation()))),
        Ok(None) => not_found(),
        Err(e) => internal_error(e),
    }
}

// --- Delete note ---

async fn delete_note(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let Ok(id) = path.into_inner().parse::<i64>() else {
        return not_found();
    };

    match data.db.delete_note(id) {
        Ok(true) => HttpResponse::Ok().json(ok_body(json!({ "id": id, "deleted": true }))),
        Ok(false) => not_found(),
        Err(e) => internal_error(e),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/notes")
            .route("", web::get().to(list_notes))
            .route("", web::post().to(create_note))
            .route("/{id}", web::get().to(get_note))
            .route("/{id}", web::put().to(update_note))
            .route("/{id}", web::delete().to(delete_note)),
    );
}
