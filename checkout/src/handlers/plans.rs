use actix_web::{HttpResponse, get, http::header::ContentType, web};

use crate::{pages, state::AppState};

#[get("/")]
pub async fn index(app_state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(pages::subscription_page(&app_state.plans))
}
