use crate::error::{FolioError, Result};
use crate::model::{DocumentFilter, Metadata};
use crate::store::{DocumentStore, TemplateStore};
use crate::template::Template;
use uuid::Uuid;

/// How callers address a document or template: a full UUID, a unique UUID
/// prefix, or a unique (case-insensitive) name match.
#[derive(Debug, Clone)]
pub enum Selector {
    Id(Uuid),
    Query(String),
}

impl Selector {
    pub fn parse(input: &str) -> Selector {
        match Uuid::parse_str(input) {
            Ok(id) => Selector::Id(id),
            Err(_) => Selector::Query(input.trim().to_string()),
        }
    }
}

pub fn resolve_document<S: DocumentStore>(store: &S, selector: &Selector) -> Result<Metadata> {
    match selector {
        Selector::Id(id) => store.get(id).map(|d| d.metadata),
        Selector::Query(query) => {
            let all = store.list(&DocumentFilter::default())?;
            pick_unique(all, query, "document", |m| (&m.id, &m.title))
        }
    }
}

pub fn resolve_template<S: TemplateStore>(store: &S, selector: &Selector) -> Result<Template> {
    match selector {
        Selector::Id(id) => store.get_template(id),
        Selector::Query(query) => {
            let all = store.list_templates()?;
            pick_unique(all, query, "template", |t| (&t.id, &t.name))
        }
    }
}

fn pick_unique<T, F>(candidates: Vec<T>, query: &str, noun: &'static str, key: F) -> Result<T>
where
    F: Fn(&T) -> (&Uuid, &String),
{
    let query_lower = query.to_lowercase();

    // 1. UUID prefix match
    let mut by_prefix: Vec<&T> = candidates
        .iter()
        .filter(|c| key(c).0.to_string().starts_with(&query_lower))
        .collect();
    if by_prefix.len() == 1 {
        let id = *key(by_prefix.remove(0)).0;
        return take_by_id(candidates, &id, key);
    }
    if by_prefix.len() > 1 {
        return Err(FolioError::Api(format!(
            "'{}' is ambiguous: {} {}s share that id prefix",
            query,
            by_prefix.len(),
            noun
        )));
    }

    // 2. Exact name match (case-insensitive)
    let exact: Vec<&T> = candidates
        .iter()
        .filter(|c| key(c).1.to_lowercase() == query_lower)
        .collect();
    match exact.len() {
        1 => {
            let id = *key(exact[0]).0;
            return take_by_id(candidates, &id, key);
        }
        n if n > 1 => {
            return Err(FolioError::Api(format!(
                "'{}' is ambiguous: {} {}s have that name",
                query, n, noun
            )));
        }
        _ => {}
    }

    // 3. Name substring match
    let partial: Vec<&T> = candidates
        .iter()
        .filter(|c| key(c).1.to_lowercase().contains(&query_lower))
        .collect();
    match partial.len() {
        1 => {
            let id = *key(partial[0]).0;
            take_by_id(candidates, &id, key)
        }
        0 => Err(FolioError::NoMatch {
            noun,
            query: query.to_string(),
        }),
        n => Err(FolioError::Api(format!(
            "'{}' is ambiguous: {} {}s match",
            query, n, noun
        ))),
    }
}

fn take_by_id<T, F>(candidates: Vec<T>, id: &Uuid, key: F) -> Result<T>
where
    F: Fn(&T) -> (&Uuid, &String),
{
    candidates
        .into_iter()
        .find(|c| key(c).0 == id)
        .ok_or_else(|| FolioError::Api("selector resolution lost its match".to_string()))
}

pub fn short_id(id: &Uuid) -> String {
    id.to_string()[..8].to_string()
}
