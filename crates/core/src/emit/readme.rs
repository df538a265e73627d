//! `README.md` describing the generated files.

use wiremap_ir::Service;

use super::{Artifact, client, dtos, mappers, routes, success_code, types};
use crate::config::{GeneratorOptions, Side};
use crate::names;

/// File name of the artifact.
pub const FILE_NAME: &str = "README.md";

/// Emit a readme listing files, interfaces and routes.
pub fn readme_file(service: &Service, options: &GeneratorOptions) -> Artifact {
    let mut output = format!("# {}\n\n", service.title);
    if let Some(description) = &service.description {
        output.push_str(&format!("{}\n\n", description.trim()));
    }
    output.push_str("Generated by wiremap. Do not edit by hand.\n\n");

    output.push_str("## Files\n\n");
    output.push_str(&format!("- `{}`: internal types and service interfaces\n", types::FILE_NAME));
    output.push_str(&format!("- `{}`: wire (DTO) types\n", dtos::FILE_NAME));
    output.push_str(&format!("- `{}`: conversions between the two\n", mappers::FILE_NAME));
    match options.role {
        Side::Server => output.push_str(&format!(
            "- `{}`: express handlers and `createRouter`\n",
            routes::FILE_NAME
        )),
        Side::Client => output.push_str(&format!(
            "- `{}`: fetch functions and `ApiError`\n",
            client::FILE_NAME
        )),
    }

    if !service.interfaces.is_empty() {
        output.push_str("\n## Interfaces\n");
    }
    for interface in &service.interfaces {
        output.push_str(&format!(
            "\n### {}\n\n",
            names::interface_name(&interface.name, &options.interface_nomenclature)
        ));
        if let Some(description) = &interface.description {
            output.push_str(&format!("{}\n\n", description.trim()));
        }
        output.push_str("| Method | Route | Status |\n|---|---|---|\n");
        for method in &interface.methods {
            let name = names::method_name(&method.name);
            let deprecated = if method.deprecated { " (deprecated)" } else { "" };
            match &method.http {
                Some(http) => output.push_str(&format!(
                    "| `{name}`{deprecated} | `{} {}` | {} |\n",
                    http.verb.as_str(),
                    http.path,
                    success_code(method, http)
                )),
                None => output.push_str(&format!("| `{name}`{deprecated} | not exposed | |\n")),
            }
        }
    }

    Artifact::new(service, FILE_NAME, output)
}
