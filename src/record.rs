//! Normalised publication records, as written to the website's data file.

use serde::{Deserialize, Serialize};

use crate::ads::bibtex::MonthTable;
use crate::ads::doc::RawDoc;
use crate::author::{self, Owner};
use crate::identifier::{arxiv, link};
use crate::sortdate::{self, DateEvidence};
use crate::tags;
use crate::text::clean_title;

const REFEREED: &str = "REFEREED";

/// Settings for the display fields derived from the author list.
#[derive(Debug, Clone)]
pub struct Mapper {
    pub owner: Owner,
    pub max_authors: usize,
}

/// One publication. Field order is the key order of the YAML output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Record {
    pub bibcode: String,
    pub title: String,
    pub authors: Vec<String>,
    pub authors_html: String,
    pub authors_short_html: String,
    pub authors_display: Vec<String>,
    /// Position of the owner in `authors`; written as `-1` when absent.
    #[serde(with = "owner_index")]
    pub me_index: Option<usize>,
    pub n_authors: usize,
    #[serde(deserialize_with = "lenient::string")]
    pub year: String,
    #[serde(rename = "pub")]
    pub venue: String,
    #[serde(deserialize_with = "lenient::string")]
    pub volume: String,
    #[serde(deserialize_with = "lenient::string")]
    pub page: String,
    #[serde(deserialize_with = "lenient::string")]
    pub page_range: String,
    pub doi: String,
    pub arxiv: String,
    pub adsurl: String,
    pub best_url: String,
    pub refereed: bool,
    #[serde(deserialize_with = "lenient::count")]
    pub citations: u64,
    pub month: String,
    pub month_num: String,
    pub sortdate: String,
    pub tags: Vec<String>,
}

impl Mapper {
    /// Turn a raw ADS document into a record. `months` holds BibTeX months by bibcode.
    pub fn map(&self, doc: &RawDoc, months: &MonthTable) -> Record {
        let bibcode = doc.text("bibcode");
        let title = clean_title(&doc.text("title"));
        let authors = doc.list("author");
        let identifiers = doc.list("identifier");
        let doi = doc.text("doi");
        let venue = doc.text("pub");
        let year = doc.text("year");
        let refereed = is_refereed(doc);

        let adsurl = link::ads_url(&bibcode, &identifiers);
        let arxiv_id = arxiv::extract(&identifiers, &doi, &bibcode, &venue);
        let best_url = link::primary_url(&doi, &identifiers, &adsurl);

        let sort = sortdate::derive(
            &DateEvidence {
                venue: &venue,
                year: &year,
                arxiv_id: &arxiv_id,
                refereed,
                bibcode: &bibcode,
            },
            months,
        );
        let tags = tags::tags_for(&title, &venue);

        Record {
            authors_html: author::authors_html(&authors, &self.owner),
            authors_short_html: author::authors_short_html(&authors, &self.owner, self.max_authors),
            authors_display: authors.iter().map(|a| author::display_name(a)).collect(),
            me_index: self.owner.position(&authors),
            n_authors: authors.len(),
            volume: doc.text("volume"),
            page: doc.text("page"),
            page_range: doc.text("page_range"),
            citations: doc.count("citation_count"),
            month: sort.month_token,
            month_num: sort.month_num,
            sortdate: sort.date,
            bibcode,
            title,
            authors,
            year,
            venue,
            doi,
            arxiv: arxiv_id,
            adsurl,
            best_url,
            refereed,
            tags,
        }
    }
}

/// Whether ADS flags the document as refereed.
pub fn is_refereed(doc: &RawDoc) -> bool {
    doc.list("property").iter().any(|p| p == REFEREED)
}

/// Most recent first: descending by (sort date, bibcode).
pub fn sort_newest_first(records: &mut [Record]) {
    records.sort_by(|a, b| {
        (b.sortdate.as_str(), b.bibcode.as_str()).cmp(&(a.sortdate.as_str(), a.bibcode.as_str()))
    });
}

mod owner_index {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(idx: &Option<usize>, s: S) -> Result<S::Ok, S::Error> {
        match idx {
            Some(i) => s.serialize_u64(*i as u64),
            None => s.serialize_i64(-1),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<usize>, D::Error> {
        let raw = Option::<i64>::deserialize(d)?;
        Ok(raw.and_then(|i| usize::try_from(i).ok()))
    }
}

/// Deserializers for hand-edited or older data files, where scalars may have changed type.
mod lenient {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Int(i64),
        Float(f64),
        Bool(bool),
        Text(String),
    }

    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(match Option::<Scalar>::deserialize(d)? {
            Some(Scalar::Text(s)) => s,
            Some(Scalar::Int(i)) => i.to_string(),
            Some(Scalar::Float(f)) => f.to_string(),
            Some(Scalar::Bool(b)) => b.to_string(),
            None => String::new(),
        })
    }

    pub fn count<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
        Ok(match Option::<Scalar>::deserialize(d)? {
            Some(Scalar::Int(i)) => u64::try_from(i).unwrap_or(0),
            Some(Scalar::Float(f)) if f > 0.0 => f as u64,
            Some(Scalar::Text(s)) => u64::try_from(crate::ads::doc::parse_int(&s)).unwrap_or(0),
            _ => 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ads::bibtex::Month;
    use serde_json::json;

    fn mapper() -> Mapper {
        Mapper {
            owner: Owner::new(&["Villaseñor", "Villasenor"]),
            max_authors: 8,
        }
    }

    fn refereed_doc() -> RawDoc {
        RawDoc::from_value(json!({
            "bibcode": "2024AJ....167..100V",
            "title": ["A Study of SDSS-V B-type Binaries"],
            "author": ["Villaseñor, J. I.", "Doe, Jane", "Smith, John, Jr."],
            "year": "2024",
            "pub": "The Astronomical Journal",
            "volume": "167",
            "page": ["100"],
            "doi": ["10.3847/1538-3881/ad0000"],
            "identifier": [
                "2024AJ....167..100V",
                "arXiv:2401.00001v2",
                "https://arxiv.org/abs/2401.00001",
                "10.3847/1538-3881/ad0000"
            ],
            "citation_count": 12,
            "property": ["ARTICLE", "REFEREED", "EPRINT_OPENACCESS"]
        }))
        .unwrap()
    }

    #[test]
    fn maps_refereed_paper() {
        let mut months = MonthTable::new();
        months.insert("2024AJ....167..100V".into(), Month { token: "jun".into(), num: "06" });
        let r = mapper().map(&refereed_doc(), &months);

        assert_eq!(r.title, "A Study of SDSS-V B-type Binaries");
        assert_eq!(r.authors_display, ["J. I. Villaseñor", "Jane Doe", "John Smith, Jr."]);
        assert_eq!(r.me_index, Some(0));
        assert_eq!(r.n_authors, 3);
        assert_eq!(r.page, "100");
        assert_eq!(r.doi, "10.3847/1538-3881/ad0000");
        assert_eq!(r.arxiv, "2401.00001");
        assert_eq!(r.adsurl, "https://ui.adsabs.harvard.edu/abs/2024AJ....167..100V");
        assert_eq!(r.best_url, "https://doi.org/10.3847/1538-3881/ad0000");
        assert!(r.refereed);
        assert_eq!(r.citations, 12);
        assert_eq!((r.month.as_str(), r.month_num.as_str()), ("jun", "06"));
        assert_eq!(r.sortdate, "2024-06-15");
        assert_eq!(r.tags, ["sdssv", "bbc"]);
    }

    #[test]
    fn sparse_document_degrades() {
        let doc = RawDoc::from_value(json!({"bibcode": "2019xyz..conf....1Q"})).unwrap();
        let r = mapper().map(&doc, &MonthTable::new());
        assert_eq!(r.title, "");
        assert_eq!(r.me_index, None);
        assert_eq!(r.sortdate, "");
        assert_eq!(r.best_url, "https://ui.adsabs.harvard.edu/abs/2019xyz..conf....1Q");
        assert!(r.tags.is_empty());
    }

    #[test]
    fn sorts_newest_first() {
        let mk = |code: &str, date: &str| Record {
            bibcode: code.into(),
            sortdate: date.into(),
            ..Default::default()
        };
        let mut rs = vec![mk("a", "2020-01-01"), mk("c", ""), mk("b", "2024-06-15"), mk("d", "2020-01-01")];
        sort_newest_first(&mut rs);
        let codes: Vec<_> = rs.iter().map(|r| r.bibcode.as_str()).collect();
        assert_eq!(codes, ["b", "d", "a", "c"]);
    }

    #[test]
    fn yaml_keeps_website_field_names() {
        let r = mapper().map(&refereed_doc(), &MonthTable::new());
        let yaml = serde_yaml::to_string(&r).unwrap();
        assert!(yaml.starts_with("bibcode: 2024AJ....167..100V\n"));
        assert!(yaml.contains("\npub: The Astronomical Journal\n"));
        assert!(yaml.contains("\nme_index: 0\n"));

        let none = Record::default();
        assert!(serde_yaml::to_string(&none).unwrap().contains("me_index: -1"));
    }

    #[test]
    fn reads_back_loose_files() {
        let yaml = "- bibcode: X\n  year: 2021\n  citations: '4'\n  me_index: -1\n- bibcode: Y\n  volume: 12\n";
        let rs: Vec<Record> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(rs[0].year, "2021");
        assert_eq!(rs[0].citations, 4);
        assert_eq!(rs[0].me_index, None);
        assert_eq!(rs[1].volume, "12");
        assert_eq!(rs[1].citations, 0);
    }

    #[test]
    fn yaml_roundtrip_is_lossless() {
        let r = mapper().map(&refereed_doc(), &MonthTable::new());
        let back: Record = serde_yaml::from_str(&serde_yaml::to_string(&r).unwrap()).unwrap();
        assert_eq!(back, r);
    }
}
