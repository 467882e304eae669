use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::error::TypeError;
use crate::kind::EntityKind;

/// Lifecycle state of an image-license record.
///
/// Encoded as a small integer on the wire: `1` = demanded, `2` = delivered.
/// A `0` (the value older clients wrote when they omitted the field) is read
/// back as [`ImageStatus::Demanded`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ImageStatus {
    #[default]
    Demanded,
    Delivered,
}

impl ImageStatus {
    pub const fn code(self) -> u8 {
        match self {
            Self::Demanded => 1,
            Self::Delivered => 2,
        }
    }
}

impl TryFrom<u8> for ImageStatus {
    type Error = TypeError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 | 1 => Ok(Self::Demanded),
            2 => Ok(Self::Delivered),
            other => Err(TypeError::InvalidStatus(other)),
        }
    }
}

impl From<ImageStatus> for u8 {
    fn from(status: ImageStatus) -> Self {
        status.code()
    }
}

impl fmt::Display for ImageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Demanded => f.write_str("demanded"),
            Self::Delivered => f.write_str("delivered"),
        }
    }
}

/// An image-license record.
///
/// `user` is a soft reference to the owning [`User`](crate::User) by
/// username. It is never assumed to resolve when the record is read back.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Image {
    pub id: String,
    pub name: String,
    pub author: String,
    pub url: String,
    /// Username of the owning account.
    pub user: String,
    /// Opaque content digest, stored as given.
    #[serde(rename = "md5-hash")]
    pub md5_hash: String,
    pub remarks: String,
    #[serde(rename = "purchase-date")]
    pub purchase_date: String,
    pub status: ImageStatus,
}

impl Image {
    /// Create a freshly demanded image owned by `user`.
    pub fn demanded(id: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            user: user.into(),
            status: ImageStatus::Demanded,
            ..Default::default()
        }
    }

    pub fn is_delivered(&self) -> bool {
        self.status == ImageStatus::Delivered
    }

    /// Apply a delivery: record the final name, digest and purchase date and
    /// move the image to [`ImageStatus::Delivered`]. Every other attribute is
    /// left untouched.
    pub fn deliver(
        &mut self,
        name: impl Into<String>,
        md5_hash: impl Into<String>,
        purchase_date: impl Into<String>,
    ) {
        self.name = name.into();
        self.md5_hash = md5_hash.into();
        self.purchase_date = purchase_date.into();
        self.status = ImageStatus::Delivered;
    }
}

impl Entity for Image {
    const KIND: EntityKind = EntityKind::Image;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Wire wrapper for image listings: `{"images": [...]}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageList {
    #[serde(default, deserialize_with = "crate::entity::null_as_empty")]
    pub images: Vec<Image>,
}
