use axum::{
	extract::State,
	response::{IntoResponse, Response},
	Extension,
};

use crate::{
	dependencies::AppState,
	domain::session::RequestContext,
	services::{
		handlers::{MessageHandler, SocialHandler},
		response::ServiceError,
	},
	views,
};

/// Anonymous visitors get the landing page; logged-in users the 100 newest
/// messages of themselves and everyone they follow.
pub(super) async fn homepage(
	State(state): State<AppState>,
	Extension(ctx): Extension<RequestContext>,
) -> Result<Response, ServiceError> {
	let Some(user) = &ctx.current_user else {
		return Ok(views::home_anon(&ctx).into_response());
	};

	let messages = MessageHandler::feed(&state.pool, user.id).await?;
	let liked_ids = SocialHandler::liked_message_ids(&state.pool, user.id).await?;
	Ok(views::home(&ctx, user, &messages, &liked_ids).into_response())
}
