use serde::{Deserialize, Serialize};

/// A stored front-of-document row.
///
/// Serialized field names follow the table columns, which is what clients of
/// the lookup endpoint receive.
#[derive(Serialize, Deserialize, sqlx::FromRow, Clone, Debug, PartialEq, Eq)]
pub struct FrontRecord {
    pub id: i64,
    pub name: String,
    #[serde(rename = "dob")]
    #[sqlx(rename = "dob")]
    pub date_of_birth: String,
    pub gender: String,
    #[serde(rename = "adhar_number")]
    #[sqlx(rename = "adhar_number")]
    pub document_number: String,
    /// Path of the uploaded image, if one was sent.
    pub image_path: Option<String>,
}

/// A stored back-of-document row.
#[derive(Serialize, Deserialize, sqlx::FromRow, Clone, Debug, PartialEq, Eq)]
pub struct BackRecord {
    pub id: i64,
    pub address: String,
    #[serde(rename = "pincode")]
    #[sqlx(rename = "pincode")]
    pub postal_code: String,
    /// The document number as re-entered on the back form; the lookup key.
    #[serde(rename = "reenter_adhar")]
    #[sqlx(rename = "reenter_adhar")]
    pub document_number_restated: String,
}

/// Fields for a front-of-document insert.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewFrontRecord {
    pub name: String,
    pub date_of_birth: String,
    pub gender: String,
    pub document_number: String,
    pub image_path: Option<String>,
}

/// Fields for a back-of-document insert.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewBackRecord {
    pub address: String,
    pub postal_code: String,
    pub document_number_restated: String,
}

impl NewFrontRecord {
    pub(crate) fn into_record(self, id: i64) -> FrontRecord {
        FrontRecord {
            id,
            name: self.name,
            date_of_birth: self.date_of_birth,
            gender: self.gender,
            document_number: self.document_number,
            image_path: self.image_path,
        }
    }
}

impl NewBackRecord {
    pub(crate) fn into_record(self, id: i64) -> BackRecord {
        BackRecord {
            id,
            address: self.address,
            postal_code: self.postal_code,
            document_number_restated: self.document_number_restated,
        }
    }
}

/// Whether a lookup needs both halves of the form to count as found.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LookupPolicy {
    /// Both a front and a back row must exist.
    #[default]
    RequireBoth,
    /// Either half is enough; the missing half is reported as absent.
    AllowPartial,
}

impl LookupPolicy {
    pub fn from_require_both(require_both: bool) -> Self {
        if require_both {
            LookupPolicy::RequireBoth
        } else {
            LookupPolicy::AllowPartial
        }
    }
}

/// Result of a lookup by document number.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DocumentDetails {
    pub front: Option<FrontRecord>,
    pub back: Option<BackRecord>,
}

impl DocumentDetails {
    pub fn is_complete(&self) -> bool {
        self.front.is_some() && self.back.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.front.is_none() && self.back.is_none()
    }

    /// True when the lookup counts as found under `policy`.
    pub fn satisfies(&self, policy: LookupPolicy) -> bool {
        match policy {
            LookupPolicy::RequireBoth => self.is_complete(),
            LookupPolicy::AllowPartial => !self.is_empty(),
        }
    }
}
