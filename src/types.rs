use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One ranked program listing after normalization
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct College {
    pub name: String,
    pub city: String,
    /// Upper-cased two-letter state code
    pub state: String,
    pub url: String,
    /// Average academic reputation score (0.0 - 5.0)
    pub score: f64,
    pub id: String,
    pub fice_code: String,
    pub rank: u32,
}

/// Colleges sharing one display rank, in arrival order
#[derive(Debug, Clone, PartialEq)]
pub struct RankGroup {
    pub display_rank: String,
    pub colleges: Vec<College>,
}

/// Display rank -> colleges, keyed in first-seen order.
///
/// Serializes as a JSON object whose keys keep insertion order, so a dumped
/// snapshot reads top to bottom the way the listing was fetched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankTable {
    groups: Vec<RankGroup>,
}

impl RankTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a college under its display rank, opening the group if needed
    pub fn push(&mut self, display_rank: &str, college: College) {
        match self.groups.iter_mut().find(|g| g.display_rank == display_rank) {
            Some(group) => group.colleges.push(college),
            None => self.groups.push(RankGroup {
                display_rank: display_rank.to_string(),
                colleges: vec![college],
            }),
        }
    }

    pub fn get(&self, display_rank: &str) -> Option<&[College]> {
        self.groups
            .iter()
            .find(|g| g.display_rank == display_rank)
            .map(|g| g.colleges.as_slice())
    }

    /// Number of distinct display ranks
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn college_count(&self) -> usize {
        self.groups.iter().map(|g| g.colleges.len()).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RankGroup> {
        self.groups.iter()
    }

    /// Every college, group by group
    pub fn colleges(&self) -> impl Iterator<Item = &College> {
        self.groups.iter().flat_map(|g| g.colleges.iter())
    }
}

impl Serialize for RankTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for group in &self.groups {
            map.serialize_entry(&group.display_rank, &group.colleges)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RankTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RankTableVisitor;

        impl<'de> Visitor<'de> for RankTableVisitor {
            type Value = RankTable;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object of display rank to college list")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<RankTable, A::Error> {
                let mut table = RankTable::new();
                while let Some((display_rank, colleges)) =
                    access.next_entry::<String, Vec<College>>()?
                {
                    for college in colleges {
                        table.push(&display_rank, college);
                    }
                }
                Ok(table)
            }
        }

        deserializer.deserialize_map(RankTableVisitor)
    }
}

// ============================================
// Search API wire types
// ============================================

/// Text-or-number token; the API is not consistent about quoting ids and codes
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Token {
    Text(String),
    Number(serde_json::Number),
}

impl Token {
    pub fn to_text(&self) -> String {
        match self {
            Token::Text(s) => s.clone(),
            Token::Number(n) => n.to_string(),
        }
    }
}

/// One entry of `data.items`
#[derive(Debug, Clone, Deserialize)]
pub struct Listing {
    pub name: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    pub id: Token,
    #[serde(default)]
    pub fice_code: Option<Token>,
    pub ranking: Ranking,
    #[serde(rename = "schoolData", default)]
    pub school_data: SchoolData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ranking {
    pub display_rank: Token,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchoolData {
    #[serde(default)]
    pub c_avg_acad_rep_score: Option<Token>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn college(name: &str, rank: u32) -> College {
        College {
            name: name.to_string(),
            city: "Pittsburgh".to_string(),
            state: "PA".to_string(),
            url: "https://example.edu".to_string(),
            score: 5.0,
            id: format!("{}-id", name),
            fice_code: "003242".to_string(),
            rank,
        }
    }

    #[test]
    fn test_push_groups_by_display_rank() {
        let mut table = RankTable::new();
        table.push("1", college("A", 1));
        table.push("2", college("B", 2));
        table.push("1", college("C", 1));

        assert_eq!(table.len(), 2);
        assert_eq!(table.college_count(), 3);
        let names: Vec<_> = table.get("1").unwrap().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["A", "C"]);
        assert!(table.get("3").is_none());
    }

    #[test]
    fn test_serialize_keeps_first_seen_order() {
        let mut table = RankTable::new();
        table.push("10", college("Late", 10));
        table.push("2", college("Early", 2));

        let json = serde_json::to_string(&table).unwrap();
        let ten = json.find("\"10\"").unwrap();
        let two = json.find("\"2\"").unwrap();
        assert!(ten < two, "keys should follow insertion order: {}", json);
    }

    #[test]
    fn test_deserialize_restores_table() {
        let mut table = RankTable::new();
        table.push("1", college("A", 1));
        table.push("1", college("B", 1));
        table.push("3", college("C", 3));

        let json = serde_json::to_string(&table).unwrap();
        let back: RankTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, table);
    }

    #[test]
    fn test_token_accepts_text_and_numbers() {
        let text: Token = serde_json::from_str("\"003242\"").unwrap();
        let number: Token = serde_json::from_str("4.6").unwrap();
        assert_eq!(text.to_text(), "003242");
        assert_eq!(number.to_text(), "4.6");
    }
}
