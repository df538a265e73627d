//! `client.ts`: fetch functions for the client role.

use std::collections::HashMap;

use tracing::{debug, warn};
use wiremap_ir::{HttpBinding, Method, ParamLocation, Parameter, Service};

use super::{Artifact, PathPart, banner, bound_methods, parse_path};
use crate::classify::TypeTable;
use crate::config::{GeneratorOptions, Side};
use crate::error::GenerateResult;
use crate::imports::ImportSet;
use crate::mapping::{Mapper, Payload, Role};
use crate::names;
use crate::render::{Facet, Module, Renderer, method_doc};
use crate::ts::{
    BinOp, Emit, ObjectEntry, TemplatePart, TsExpr, TsFunction, TsLiteral, TsModule, TsParam,
    TsStmt, TsType, VarKind,
};

/// File name of the artifact.
pub const FILE_NAME: &str = "client.ts";

/// Emit one fetch function per HTTP-bound method of `service`.
///
/// Method names shared by several interfaces are prefixed with the
/// interface name to keep exports unique.
pub fn client_file(service: &Service, options: &GeneratorOptions) -> GenerateResult<Artifact> {
    let table = TypeTable::new(service);
    let mapper = Mapper::new(Renderer::new(&table, options, Module::Client));

    let mut counts: HashMap<String, usize> = HashMap::new();
    for interface in &service.interfaces {
        for (method, _) in bound_methods(interface) {
            *counts.entry(names::method_name(&method.name)).or_default() += 1;
        }
    }

    let mut needs = ImportSet::new();
    let mut functions = vec![api_error_class()];
    for interface in &service.interfaces {
        for (method, http) in bound_methods(interface) {
            let plain = names::method_name(&method.name);
            let name = if counts.get(&plain).copied().unwrap_or_default() > 1 {
                format!(
                    "{}{}",
                    names::property_name(&interface.name),
                    names::type_name(&method.name)
                )
            } else {
                plain
            };
            functions.push(fetch_function(&mapper, name, method, http, &mut needs));
        }
    }
    debug!(functions = functions.len() - 1, "Built fetch client.");

    let module = TsModule {
        banner: banner(service),
        imports: needs.to_imports(),
        types: vec![],
        functions,
    };
    Ok(Artifact::new(service, FILE_NAME, module.emit()))
}

/// Since our AST doesn't have class support, the class is a raw block.
fn api_error_class() -> TsFunction {
    TsFunction::raw(
        r"export class ApiError extends Error {
  status: number;
  statusText: string;
  body: unknown;

  constructor(status: number, statusText: string, body: unknown) {
    super(`HTTP ${status}: ${statusText}`);
    this.name = 'ApiError';
    this.status = status;
    this.statusText = statusText;
    this.body = body;
  }
}",
    )
}

fn fetch_function(
    mapper: &Mapper<'_>,
    name: String,
    method: &Method,
    http: &HttpBinding,
    needs: &mut ImportSet,
) -> TsFunction {
    let renderer = mapper.renderer();
    let mut params = Vec::new();
    if let Some((ty, _)) = renderer.render_params(method, Facet::Internal, needs) {
        params.push(TsParam::typed("params", ty));
    }
    params.push(TsParam {
        name: "options".into(),
        ty: Some(TsType::named("RequestInit")),
        optional: true,
    });

    let located = |location: ParamLocation| {
        method
            .parameters
            .iter()
            .filter(|p| http.location_of(&p.name) == location)
            .collect::<Vec<_>>()
    };
    let query = located(ParamLocation::Query);
    let headers = located(ParamLocation::Header);
    let body = located(ParamLocation::Body);

    let mut stmts = Vec::new();
    let path = path_template(mapper, method, &http.path, needs);
    let has_path_params = path.iter().any(|p| matches!(p, TemplatePart::Dynamic(_)));

    let url = if query.is_empty() {
        if has_path_params {
            TsExpr::Template(path)
        } else {
            TsExpr::string(http.path.clone())
        }
    } else {
        stmts.push(TsStmt::VarDecl {
            kind: VarKind::Const,
            name: "searchParams".into(),
            ty: None,
            init: TsExpr::new_of("URLSearchParams", vec![]),
        });
        for param in &query {
            stmts.push(query_stmt(mapper, param, needs));
        }
        stmts.push(TsStmt::VarDecl {
            kind: VarKind::Const,
            name: "queryString".into(),
            ty: None,
            init: TsExpr::ident("searchParams").method("toString", vec![]),
        });
        let mut with_query = path.clone();
        with_query.push(TemplatePart::Static("?".into()));
        with_query.push(TemplatePart::Dynamic(TsExpr::ident("queryString")));
        stmts.push(TsStmt::VarDecl {
            kind: VarKind::Const,
            name: "url".into(),
            ty: None,
            init: TsExpr::ternary(
                TsExpr::ident("queryString"),
                TsExpr::Template(with_query),
                TsExpr::Template(path),
            ),
        });
        TsExpr::ident("url")
    };

    let mut init = vec![
        ObjectEntry::Spread(TsExpr::ident("options")),
        ObjectEntry::Prop("method".into(), TsExpr::string(http.verb.as_str())),
    ];
    if !body.is_empty() || !headers.is_empty() {
        let mut entries = Vec::new();
        if !body.is_empty() {
            entries.push(ObjectEntry::Prop(
                "Content-Type".into(),
                TsExpr::string("application/json"),
            ));
        }
        for param in &headers {
            entries.push(header_entry(mapper, param, needs));
        }
        entries.push(ObjectEntry::Spread(TsExpr::Raw("options?.headers".into())));
        init.push(ObjectEntry::Prop("headers".into(), TsExpr::Object(entries)));
    }
    if !body.is_empty() {
        let payload = match body.as_slice() {
            [only] => outbound(mapper, only, needs),
            _ => TsExpr::Object(
                body.iter()
                    .map(|param| {
                        ObjectEntry::Prop(
                            Renderer::property_key(&param.name, Facet::Wire),
                            outbound(mapper, param, needs),
                        )
                    })
                    .collect(),
            ),
        };
        init.push(ObjectEntry::Prop(
            "body".into(),
            TsExpr::ident("JSON").method("stringify", vec![payload]),
        ));
    }
    stmts.push(TsStmt::VarDecl {
        kind: VarKind::Const,
        name: "res".into(),
        ty: None,
        init: TsExpr::Await(Box::new(
            TsExpr::ident("fetch").call(vec![url, TsExpr::Object(init)]),
        )),
    });

    // Error handling
    stmts.push(TsStmt::Raw(
        r"if (!res.ok) {
  const body = await res.text();
  let parsed: unknown;
  try { parsed = JSON.parse(body); } catch { parsed = body; }
  throw new ApiError(res.status, res.statusText, parsed);
}"
        .into(),
    ));

    if let Some(returns) = &method.returns {
        if returns.is_optional {
            stmts.push(TsStmt::Raw("if (res.status === 204) return undefined;".into()));
        }
        stmts.push(TsStmt::VarDecl {
            kind: VarKind::Const,
            name: "data".into(),
            ty: Some(renderer.render_value(returns, Facet::Wire, needs)),
            init: TsExpr::Await(Box::new(TsExpr::ident("res").method("json", vec![]))),
        });
        stmts.push(TsStmt::Return(Some(mapper.map_expression(
            returns,
            Role::for_payload(Side::Client, Payload::Returns),
            TsExpr::ident("data"),
            needs,
        ))));
    }

    TsFunction {
        name,
        type_params: vec![],
        params,
        return_type: Some(TsType::promise(renderer.render_returns(
            method,
            Facet::Internal,
            needs,
        ))),
        body: stmts,
        is_async: true,
        is_export: true,
        is_arrow: true,
        doc: method_doc(method),
    }
}

fn access(param: &Parameter) -> TsExpr {
    TsExpr::ident("params").member(&names::property_name(&param.name))
}

/// Wire form of a parameter, guarded as its modifiers require.
fn outbound(mapper: &Mapper<'_>, param: &Parameter, needs: &mut ImportSet) -> TsExpr {
    mapper.map_expression(
        &param.value,
        Role::for_payload(Side::Client, Payload::Params),
        access(param),
        needs,
    )
}

/// Wire form of a parameter already known to be present.
fn outbound_present(mapper: &Mapper<'_>, param: &Parameter, needs: &mut ImportSet) -> TsExpr {
    let mut value = param.value.clone();
    value.is_optional = false;
    value.is_nullable = false;
    mapper.map_expression(
        &value,
        Role::for_payload(Side::Client, Payload::Params),
        access(param),
        needs,
    )
}

fn stringify(expr: TsExpr) -> TsExpr {
    TsExpr::ident("String").call(vec![expr])
}

fn is_present(param: &Parameter) -> TsExpr {
    TsExpr::bin(
        access(param),
        BinOp::NotEqual,
        TsExpr::Literal(TsLiteral::Null),
    )
}

fn path_template(
    mapper: &Mapper<'_>,
    method: &Method,
    path: &str,
    needs: &mut ImportSet,
) -> Vec<TemplatePart> {
    parse_path(path)
        .into_iter()
        .map(|part| match part {
            PathPart::Static(text) => TemplatePart::Static(text),
            PathPart::Param(name) => {
                match method.parameters.iter().find(|p| p.name == name) {
                    Some(param) => TemplatePart::Dynamic(
                        TsExpr::ident("encodeURIComponent")
                            .call(vec![stringify(outbound_present(mapper, param, needs))]),
                    ),
                    None => {
                        warn!(method = %method.name, placeholder = %name, "Path placeholder matches no parameter.");
                        TemplatePart::Static(format!("{{{name}}}"))
                    }
                }
            }
        })
        .collect()
}

fn query_stmt(mapper: &Mapper<'_>, param: &Parameter, needs: &mut ImportSet) -> TsStmt {
    let key = TsExpr::string(Renderer::property_key(&param.name, Facet::Wire));
    let value = outbound_present(mapper, param, needs);
    let add = if param.value.is_array {
        value.method(
            "forEach",
            vec![TsExpr::arrow(
                "v",
                TsExpr::ident("searchParams")
                    .method("append", vec![key, stringify(TsExpr::ident("v"))]),
            )],
        )
    } else {
        TsExpr::ident("searchParams").method("set", vec![key, stringify(value)])
    };
    if param.value.is_optional || param.value.is_nullable {
        TsStmt::If {
            cond: is_present(param),
            then_body: vec![TsStmt::Expr(add)],
            else_body: None,
        }
    } else {
        TsStmt::Expr(add)
    }
}

fn header_entry(mapper: &Mapper<'_>, param: &Parameter, needs: &mut ImportSet) -> ObjectEntry {
    let key = Renderer::property_key(&param.name, Facet::Wire);
    let value = stringify(outbound_present(mapper, param, needs));
    if param.value.is_optional || param.value.is_nullable {
        ObjectEntry::Spread(TsExpr::bin(
            is_present(param),
            BinOp::And,
            TsExpr::Object(vec![ObjectEntry::Prop(key, value)]),
        ))
    } else {
        ObjectEntry::Prop(key, value)
    }
}
