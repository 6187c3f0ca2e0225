use serde::ser::{Serialize, SerializeMap, Serializer};

/// Public view of one activity as returned by `GET /activities`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ActivityDetails {
    pub description: String,
    pub schedule: String,
    pub max_participants: i32,
    /// Emails of the registered students, in registration order
    pub participants: Vec<String>,
}

/// All activities keyed by name.
///
/// Kept as an ordered list rather than a map so the JSON object lists the
/// activities in storage order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityCatalog {
    entries: Vec<(String, ActivityDetails)>,
}

impl ActivityCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: String, details: ActivityDetails) {
        self.entries.push((name, details));
    }

    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<&ActivityDetails> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, details)| details)
    }

    #[cfg(test)]
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ActivityCatalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, details) in &self.entries {
            map.serialize_entry(name, details)?;
        }
        map.end()
    }
}

/// Derives a display name from the local part of an email address.
///
/// Every run of letters is title-cased: `john.doe@x` gives `John.Doe`.
pub fn display_name_from_email(email: &str) -> String {
    let local = email.split('@').next().unwrap_or_default();
    let mut out = String::with_capacity(local.len());
    let mut previous_is_letter = false;
    for c in local.chars() {
        if c.is_alphabetic() {
            if previous_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            out.push(c);
            previous_is_letter = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(participants: &[&str]) -> ActivityDetails {
        ActivityDetails {
            description: "desc".into(),
            schedule: "Mondays".into(),
            max_participants: 3,
            participants: participants.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[test]
    fn test_catalog_serializes_in_insertion_order() {
        let mut catalog = ActivityCatalog::new();
        catalog.push("Zoology".into(), details(&["a@x.edu"]));
        catalog.push("Art".into(), details(&[]));

        let json = serde_json::to_string(&catalog).unwrap();
        assert!(json.find("Zoology").unwrap() < json.find("Art").unwrap());

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["Zoology"]["participants"][0], "a@x.edu");
        assert_eq!(value["Art"]["max_participants"], 3);
    }

    #[test]
    fn test_catalog_lookup() {
        let mut catalog = ActivityCatalog::new();
        assert!(catalog.is_empty());
        catalog.push("Chess Club".into(), details(&["michael@mergington.edu"]));

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.names().collect::<Vec<_>>(), vec!["Chess Club"]);
        assert_eq!(catalog.get("Chess Club").unwrap().participants.len(), 1);
        assert!(catalog.get("Math Club").is_none());
    }

    #[test]
    fn test_display_name_from_email() {
        assert_eq!(display_name_from_email("newstudent@mergington.edu"), "Newstudent");
        assert_eq!(display_name_from_email("john.doe@mergington.edu"), "John.Doe");
        assert_eq!(display_name_from_email("MARY_ann2b@x"), "Mary_Ann2B");
        assert_eq!(display_name_from_email("no-at-sign"), "No-At-Sign");
        assert_eq!(display_name_from_email(""), "");
    }
}
