use crate::metadata::columns::{DATA_SOURCE_DESCRIPTION, DATA_SOURCE_NAME, URL};
use crate::metadata::{literal, MetadataElement, MetadataObject};
use crate::{OlapResult, TupleRef};
use oxrdf::Term;

/// A data source that is reachable through the Linked Data Engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Database {
    pub element: MetadataElement,
    pub url: Option<String>,
}

impl MetadataObject for Database {
    const COLUMNS: &'static [&'static str] = &[DATA_SOURCE_NAME, DATA_SOURCE_DESCRIPTION, URL];

    fn element(&self) -> &MetadataElement {
        &self.element
    }

    fn from_tuple(tuple: TupleRef<'_>) -> OlapResult<Self> {
        let mut element = MetadataElement::from_tuple(&tuple, DATA_SOURCE_NAME, None, None)?;
        element.unique_name.clone_from(&element.name);
        if let Some(description) = tuple.get_str(DATA_SOURCE_DESCRIPTION) {
            description.clone_into(&mut element.description);
        }
        Ok(Self {
            element,
            url: tuple.get_str(URL).map(str::to_owned),
        })
    }

    fn to_row(&self) -> Vec<Term> {
        vec![
            literal(&self.element.name),
            literal(&self.element.description),
            literal(self.url.as_deref().unwrap_or_default()),
        ]
    }
}
