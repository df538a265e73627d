//! Artifact emission.
//!
//! Each submodule turns a [`Service`] into one generated file. Entry points
//! build their own [`TypeTable`](crate::classify::TypeTable), so one artifact
//! failing leaves the others unaffected.

pub mod client;
pub mod dtos;
pub mod mappers;
pub mod readme;
pub mod routes;
pub mod types;

use std::path::PathBuf;

use rayon::prelude::*;
use wiremap_ir::{HttpBinding, Interface, Method, Service};

use crate::error::GenerateResult;
use crate::imports::ImportSet;
use crate::names;

/// A generated file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Path segments, rooted at the kebab-cased service title.
    pub path: Vec<String>,
    /// File contents.
    pub contents: String,
}

impl Artifact {
    /// `<service-title>/<file>`.
    pub fn new(service: &Service, file: &str, contents: String) -> Self {
        Self {
            path: vec![names::kebab(&service.title), file.to_string()],
            contents,
        }
    }

    /// Path relative to an output directory.
    pub fn relative_path(&self) -> PathBuf {
        self.path.iter().collect()
    }

    /// Last path segment.
    pub fn file_name(&self) -> &str {
        self.path.last().map_or("", String::as_str)
    }
}

/// Header comment of every generated TypeScript file.
pub(crate) fn banner(service: &Service) -> Vec<String> {
    vec![
        format!("Generated by wiremap from the {} service description.", service.title),
        "Do not edit by hand.".to_string(),
    ]
}

/// Methods of `interface` that carry an HTTP binding, in declaration order.
pub(crate) fn bound_methods(interface: &Interface) -> impl Iterator<Item = (&Method, &HttpBinding)> {
    interface
        .methods
        .iter()
        .filter_map(|method| method.http.as_ref().map(|http| (method, http)))
}

/// Status sent on success: the declared code, else 200 with a result and
/// 204 without.
pub fn success_code(method: &Method, http: &HttpBinding) -> u16 {
    http.success_code
        .unwrap_or(if method.returns.is_some() { 200 } else { 204 })
}

/// Segment of an HTTP path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPart {
    /// Literal text.
    Static(String),
    /// `{name}` placeholder.
    Param(String),
}

/// Split `/widgets/{id}/parts` into static and placeholder segments.
pub fn parse_path(path: &str) -> Vec<PathPart> {
    let mut template = Vec::new();
    let mut current = String::new();
    let mut in_param = false;

    for c in path.chars() {
        if c == '{' && !in_param {
            if !current.is_empty() {
                template.push(PathPart::Static(std::mem::take(&mut current)));
            }
            in_param = true;
        } else if c == '}' && in_param {
            template.push(PathPart::Param(std::mem::take(&mut current)));
            in_param = false;
        } else {
            current.push(c);
        }
    }
    if in_param {
        // Unterminated placeholder stays literal.
        current.insert(0, '{');
    }
    if !current.is_empty() {
        template.push(PathPart::Static(current));
    }
    template
}

/// Build one item per declaration on rayon's pool, then sort by name and
/// merge the per-declaration import sets. The first failing declaration in
/// input order wins.
pub(crate) fn build_sorted<D, T, F>(decls: &[D], build: F) -> GenerateResult<(Vec<T>, ImportSet)>
where
    D: Sync,
    T: Send,
    F: Fn(&D, &mut ImportSet) -> GenerateResult<(String, T)> + Sync,
{
    let results: Vec<GenerateResult<(String, T, ImportSet)>> = decls
        .par_iter()
        .map(|decl| {
            let mut needs = ImportSet::new();
            let (name, item) = build(decl, &mut needs)?;
            Ok((name, item, needs))
        })
        .collect();

    let mut built = results.into_iter().collect::<GenerateResult<Vec<_>>>()?;
    built.sort_by(|a, b| a.0.cmp(&b.0));

    let mut needs = ImportSet::new();
    let items = built
        .into_iter()
        .map(|(_, item, item_needs)| {
            needs.merge(item_needs);
            item
        })
        .collect();
    Ok((items, needs))
}
