//! Text front-ends: RIB patch files and XML grammar documents.

pub mod grammar_xml;
pub mod rib;
