//! Static category-tag → keyword lookup table
//!
//! Raw feed tags are short codes (`cs.AI`); persisted keywords are the
//! human-readable archive names. Tags with no mapping pass through verbatim
//! so cross-listed entries from other archives keep their codes.

use rustc_hash::FxHashSet;

/// arXiv CS category code → human-readable keyword
const CATEGORY_MAP: &[(&str, &str)] = &[
    ("cs.AI", "Artificial Intelligence"),
    ("cs.AR", "Hardware Architecture"),
    ("cs.CC", "Computational Complexity"),
    ("cs.CE", "Computational Engineering"),
    ("cs.CG", "Computational Geometry"),
    ("cs.CL", "Computation and Language"),
    ("cs.CR", "Cryptography and Security"),
    ("cs.CV", "Computer Vision and Pattern Recognition"),
    ("cs.CY", "Computers and Society"),
    ("cs.DB", "Databases"),
    ("cs.DC", "Distributed and Parallel Computing"),
    ("cs.DL", "Digital Libraries"),
    ("cs.DM", "Discrete Mathematics"),
    ("cs.DS", "Data Structures and Algorithms"),
    ("cs.ET", "Emerging Technologies"),
    ("cs.FL", "Formal Languages and Automata Theory"),
    ("cs.GL", "General Literature"),
    ("cs.GR", "Graphics"),
    ("cs.GT", "Game Theory"),
    ("cs.HC", "Human-Computer Interaction"),
    ("cs.IR", "Information Retrieval"),
    ("cs.IT", "Information Theory"),
    ("cs.LG", "Machine Learning"),
    ("cs.LO", "Logic in Computer Science"),
    ("cs.MA", "Multiagent Systems"),
    ("cs.MM", "Multimedia"),
    ("cs.MS", "Mathematical Software"),
    ("cs.NA", "Numerical Analysis"),
    ("cs.NE", "Neural and Evolutionary Computing"),
    ("cs.NI", "Networking and Internet Architecture"),
    ("cs.OH", "Other Computer Science"),
    ("cs.OS", "Operating Systems"),
    ("cs.PF", "Performance"),
    ("cs.PL", "Programming Languages"),
    ("cs.RO", "Robotics"),
    ("cs.SC", "Symbolic Computation"),
    ("cs.SD", "Sound"),
    ("cs.SE", "Software Engineering"),
    ("cs.SI", "Social and Information Networks"),
    ("cs.SY", "Systems and Control"),
];

/// Look up the keyword for a raw category tag.
pub fn keyword_for(tag: &str) -> Option<&'static str> {
    CATEGORY_MAP
        .iter()
        .find(|(code, _)| *code == tag)
        .map(|(_, name)| *name)
}

/// Map raw tags to keywords, deduplicated in first-seen order.
///
/// Unknown tags pass through verbatim. Duplicates arise when several tags map
/// to the same keyword or a tag repeats in the feed entry.
pub fn map_keywords(tags: &[String]) -> Vec<String> {
    let mut seen = FxHashSet::default();
    let mut keywords = Vec::with_capacity(tags.len());
    for tag in tags {
        let keyword = keyword_for(tag).map_or_else(|| tag.clone(), str::to_string);
        if seen.insert(keyword.clone()) {
            keywords.push(keyword);
        }
    }
    keywords
}
