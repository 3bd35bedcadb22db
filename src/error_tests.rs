use super::*;

#[test]
fn http_status_mapping() {
    assert_eq!(AppError::user("bad_input", "oops").http_status(), 400);
    assert_eq!(AppError::auth("auth", "no").http_status(), 401);
    assert_eq!(AppError::forbidden("forbidden", "blocked").http_status(), 403);
    assert_eq!(AppError::not_found("not_found", "missing").http_status(), 404);
    assert_eq!(AppError::conflict("conflict", "dup").http_status(), 409);
    assert_eq!(AppError::rate_limited("slow_down", "later").http_status(), 429);
    assert_eq!(AppError::upstream("upstream", "down").http_status(), 502);
    assert_eq!(AppError::internal("internal", "panic").http_status(), 500);
}

#[test]
fn shorthand_constructors() {
    let e = AppError::not_authenticated();
    assert_eq!(e.http_status(), 401);
    assert_eq!(e.message(), "Not authenticated");
    let e = AppError::admin_required();
    assert_eq!(e.http_status(), 403);
    assert_eq!(e.code_str(), "admin_required");
}

#[test]
fn anyhow_keeps_wrapped_app_error() {
    let wrapped = anyhow::Error::new(AppError::not_found("room_not_found", "Room not found"));
    let back: AppError = wrapped.into();
    assert_eq!(back, AppError::not_found("room_not_found", "Room not found"));

    let plain: AppError = anyhow::anyhow!("disk on fire").into();
    assert_eq!(plain.http_status(), 500);
    // internals are not leaked to clients
    assert_eq!(plain.message(), "Internal server error");
}

#[test]
fn display_joins_code_and_message() {
    assert_eq!(AppError::user("bad_input", "oops").to_string(), "bad_input: oops");
}

#[test]
fn into_response_uses_mapped_status() {
    let resp = AppError::forbidden("not_authorized", "Not authorized").into_response();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}
