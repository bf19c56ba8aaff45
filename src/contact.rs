use serde::Deserialize;
use thiserror::Error;

/// Identifier string embedded in every generated card.
pub const PRODID: &str = "-//qrvcard//EN";

#[derive(Debug, Error)]
pub enum CardError {
    #[error("missing required field '{0}'")]
    MissingField(&'static str),
}

/// One record of the input CSV. Only `fname` and `lname` are required;
/// every other column may be absent or empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactRow {
    #[serde(default)]
    pub fname: String,
    #[serde(default)]
    pub lname: String,
    #[serde(default)]
    pub office_phone: String,
    #[serde(default)]
    pub mobile_phone: String,
    #[serde(default)]
    pub org: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub email: String,
}

impl ContactRow {
    /// Best-effort label for error reports, usable even when a required
    /// field is missing.
    pub fn label(&self) -> String {
        let joined = format!("{} {}", self.fname.trim(), self.lname.trim());
        let trimmed = joined.trim();
        if trimmed.is_empty() {
            "(unnamed)".to_string()
        } else {
            trimmed.to_string()
        }
    }
}

/// A contact ready for serialization, built once per input row.
///
/// iPhone vCard exports use the fixed `N:last;first;;;` four-part form
/// and tagged TEL lines; importing anything looser makes the Contacts
/// app show raw vCard syntax instead of dialable numbers, so the layout
/// here mirrors those exports exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactCard {
    first: String,
    last: String,
    office_phone: String,
    mobile_phone: String,
    org: String,
    title: String,
    email: String,
}

impl ContactCard {
    /// Build a card from a CSV row, rejecting rows without both names.
    pub fn from_row(row: &ContactRow) -> Result<Self, CardError> {
        if row.fname.trim().is_empty() {
            return Err(CardError::MissingField("fname"));
        }
        if row.lname.trim().is_empty() {
            return Err(CardError::MissingField("lname"));
        }
        Ok(Self {
            first: row.fname.clone(),
            last: row.lname.clone(),
            office_phone: row.office_phone.clone(),
            mobile_phone: row.mobile_phone.clone(),
            org: row.org.clone(),
            title: row.title.clone(),
            email: row.email.clone(),
        })
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first, self.last)
    }

    /// Filename stem shared by this contact's generated assets.
    /// Note the historical quirk: no separator before the suffix token.
    pub fn image_file_stem(&self) -> String {
        format!("{}-{}vcard-qr", self.first, self.last)
    }

    pub fn image_filename(&self) -> String {
        format!("{}.png", self.image_file_stem())
    }

    /// Serialize as a vCard 3.0 text block with LF line endings.
    ///
    /// TEL lines are emitted only for numbers that are present; an empty
    /// TEL value would import as a blank-but-tagged phone entry.
    pub fn to_vcard(&self) -> String {
        let mut out = String::new();
        out.push_str("BEGIN:VCARD\n");
        out.push_str("VERSION:3.0\n");
        out.push_str(&format!("PRODID:{}\n", PRODID));
        out.push_str(&format!(
            "N:{};{};;;\n",
            escape_text(&self.last),
            escape_text(&self.first)
        ));
        out.push_str(&format!("FN:{}\n", escape_text(&self.display_name())));
        if !self.mobile_phone.is_empty() {
            out.push_str(&format!(
                "TEL;type=CELL;type=VOICE;type=pref:{}\n",
                self.mobile_phone
            ));
        }
        if !self.office_phone.is_empty() {
            out.push_str(&format!("TEL;type=WORK;type=VOICE:{}\n", self.office_phone));
        }
        out.push_str(&format!("ORG:{}\n", escape_text(&self.org)));
        out.push_str(&format!("TITLE:{}\n", escape_text(&self.title)));
        out.push_str(&format!(
            "EMAIL;type=INTERNET;type=WORK;type=pref:{}\n",
            self.email
        ));
        out.push_str("END:VCARD\n");
        out
    }
}

/// Escape vCard structural characters in a free-text value.
fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(ch),
        }
    }
    out
}
