use serde::{Deserialize, Serialize};

pub const DEFAULT_IMAGE_URL: &str = "/static/images/default-pic.png";
pub const DEFAULT_HEADER_IMAGE_URL: &str = "/static/images/warbler-hero.jpg";

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
	pub id: i64,
	pub email: String,
	pub username: String,
	pub image_url: String,
	pub header_image_url: String,
	pub bio: Option<String>,
	pub location: Option<String>,
	/// bcrypt hash, never the cleartext password
	#[serde(skip_serializing)]
	pub password: String,
}

/// A user about to be inserted; `password` already holds the hash.
#[derive(Clone, Debug)]
pub struct NewUser {
	pub username: String,
	pub email: String,
	pub password: String,
	pub image_url: String,
}

/// Profile fields to overwrite. `None` leaves the stored value untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProfileChanges {
	pub username: Option<String>,
	pub email: Option<String>,
	pub image_url: Option<String>,
	pub header_image_url: Option<String>,
	pub bio: Option<String>,
	pub location: Option<String>,
}

impl ProfileChanges {
	pub fn is_empty(&self) -> bool {
		*self == ProfileChanges::default()
	}

	pub(crate) fn apply(
		self,
		user: &mut User,
	) {
		if let Some(username) = self.username {
			user.username = username;
		}
		if let Some(email) = self.email {
			user.email = email;
		}
		if let Some(image_url) = self.image_url {
			user.image_url = image_url;
		}
		if let Some(header_image_url) = self.header_image_url {
			user.header_image_url = header_image_url;
		}
		if let Some(bio) = self.bio {
			user.bio = Some(bio);
		}
		if let Some(location) = self.location {
			user.location = Some(location);
		}
	}
}
