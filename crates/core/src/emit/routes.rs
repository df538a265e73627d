//! `routes.ts`: express handlers and a router factory for the server role.
//!
//! Each HTTP-bound method gets an async `handleX(service, req, res, next)`
//! that reads its inputs from the request, maps them inbound, calls the
//! service and answers with the mapped result. Validation errors become a
//! 400 response; anything else goes to `next`. Method names shared by
//! several interfaces get the interface name in their handler name.

use std::collections::{HashMap, HashSet};

use tracing::debug;
use wiremap_ir::{HttpBinding, Method, ParamLocation, Service};

use super::{Artifact, PathPart, banner, bound_methods, parse_path, success_code};
use crate::classify::TypeTable;
use crate::config::{GeneratorOptions, Side, Validation};
use crate::error::GenerateResult;
use crate::imports::ImportSet;
use crate::mapping::{Mapper, Payload, Role};
use crate::names;
use crate::render::{Facet, Module, Renderer, TYPES_ALIAS};
use crate::ts::{
    BinOp, Emit, ObjectEntry, TsDoc, TsExpr, TsFunction, TsLiteral, TsModule, TsParam,
    TsPrimitive, TsStmt, TsType, VarKind,
};

/// File name of the artifact.
pub const FILE_NAME: &str = "routes.ts";

const EXPRESS: &str = "express";
const SERVICE: &str = "service";

/// Emit the express routes of `service`.
pub fn routes_file(service: &Service, options: &GeneratorOptions) -> GenerateResult<Artifact> {
    let table = TypeTable::new(service);
    let mapper = Mapper::new(Renderer::new(&table, options, Module::Routes));

    let mut needs = ImportSet::new();
    for name in ["NextFunction", "Request", "Response"] {
        needs.use_named(EXPRESS, name, true);
    }
    needs.use_named(EXPRESS, "Router", false);
    let validation_error = match options.validation {
        Validation::Zod => {
            needs.use_named("zod", "ZodError", false);
            "ZodError"
        }
        Validation::Other => {
            needs.use_named(&options.validators_import_path, "ValidationError", false);
            "ValidationError"
        }
    };

    let mut counts: HashMap<String, usize> = HashMap::new();
    for interface in &service.interfaces {
        for (method, _) in bound_methods(interface) {
            *counts.entry(names::handler_name(&method.name)).or_default() += 1;
        }
    }

    let mut functions = Vec::new();
    let mut factories = Vec::new();
    let mut registrations = Vec::new();
    for interface in &service.interfaces {
        let mut bound = bound_methods(interface).peekable();
        if bound.peek().is_none() {
            continue;
        }
        let interface_name = names::interface_name(&interface.name, &options.interface_nomenclature);
        needs.use_namespace(TYPES_ALIAS, &options.types_import_path, true);
        let service_ty = TsType::named(format!("{TYPES_ALIAS}.{interface_name}"));
        let factory = format!("get{interface_name}");

        for (method, http) in bound {
            let plain = names::handler_name(&method.name);
            let name = if counts.get(&plain).copied().unwrap_or_default() > 1 {
                format!(
                    "handle{}{}",
                    names::type_name(&interface.name),
                    names::type_name(&method.name)
                )
            } else {
                plain
            };
            registrations.push(register(&name, &factory, http));
            functions.push(handler(
                &mapper,
                name,
                method,
                http,
                &service_ty,
                validation_error,
                &mut needs,
            ));
        }
        factories.push(TsParam::typed(
            factory,
            TsType::named(format!("(req: Request) => {}", service_ty.emit())),
        ));
    }
    debug!(handlers = functions.len(), "Built route handlers.");
    functions.push(create_router(factories, registrations));

    let module = TsModule {
        banner: banner(service),
        imports: needs.to_imports(),
        types: vec![],
        functions,
    };
    Ok(Artifact::new(service, FILE_NAME, module.emit()))
}

/// Express form of a path template: `/widgets/{id}` -> `/widgets/:id`.
pub fn express_path(path: &str) -> String {
    parse_path(path)
        .into_iter()
        .map(|part| match part {
            PathPart::Static(text) => text,
            PathPart::Param(name) => format!(":{name}"),
        })
        .collect()
}

fn handler(
    mapper: &Mapper<'_>,
    name: String,
    method: &Method,
    http: &HttpBinding,
    service_ty: &TsType,
    validation_error: &str,
    needs: &mut ImportSet,
) -> TsFunction {
    let renderer = mapper.renderer();
    let mut used: HashSet<String> = [SERVICE, "req", "res", "next", "result", "err"]
        .into_iter()
        .map(String::from)
        .collect();
    let body_params = method
        .parameters
        .iter()
        .filter(|p| http.location_of(&p.name) == ParamLocation::Body)
        .count();

    let mut stmts = Vec::new();
    let mut args = Vec::new();
    for param in &method.parameters {
        let wire = Renderer::property_key(&param.name, Facet::Wire);
        let req = TsExpr::ident("req");
        let read = match http.location_of(&param.name) {
            ParamLocation::Path => req.member("params").member(&wire),
            ParamLocation::Query => req.member("query").member(&wire),
            ParamLocation::Header => req.method("header", vec![TsExpr::string(wire)]),
            // A single body parameter is the whole body.
            ParamLocation::Body if body_params == 1 => req.member("body"),
            ParamLocation::Body => req.member("body").member(&wire),
        };
        let mut wire_ty = renderer.render_value(&param.value, Facet::Wire, needs);
        if param.value.is_optional {
            wire_ty = TsType::union_of([wire_ty, TsType::primitive(TsPrimitive::Undefined)]);
        }

        let local = names::unique_local(&param.name, &mut used);
        stmts.push(TsStmt::VarDecl {
            kind: VarKind::Const,
            name: local.clone(),
            ty: None,
            init: TsExpr::Cast {
                expr: Box::new(read),
                ty: wire_ty,
            },
        });
        args.push(ObjectEntry::Prop(
            names::property_name(&param.name),
            mapper.map_expression(
                &param.value,
                Role::for_payload(Side::Server, Payload::Params),
                TsExpr::ident(local),
                needs,
            ),
        ));
    }

    let call_args = if args.is_empty() {
        vec![]
    } else {
        vec![TsExpr::Object(args)]
    };
    let call = TsExpr::Await(Box::new(
        TsExpr::ident(SERVICE).method(&names::method_name(&method.name), call_args),
    ));
    let status = TsExpr::ident("res").method(
        "status",
        vec![TsExpr::Literal(TsLiteral::Int(i64::from(success_code(method, http))))],
    );
    match &method.returns {
        Some(value) => {
            stmts.push(TsStmt::VarDecl {
                kind: VarKind::Const,
                name: "result".into(),
                ty: None,
                init: call,
            });
            let mapped = mapper.map_expression(
                value,
                Role::for_payload(Side::Server, Payload::Returns),
                TsExpr::ident("result"),
                needs,
            );
            stmts.push(TsStmt::Expr(status.method("json", vec![mapped])));
        }
        None => {
            stmts.push(TsStmt::Expr(call));
            stmts.push(TsStmt::Expr(status.method("send", vec![])));
        }
    }

    let route = format!("{} {}", http.verb.as_str(), http.path);
    let err = TsExpr::ident("err");
    let on_error = vec![TsStmt::If {
        cond: TsExpr::bin(err.clone(), BinOp::InstanceOf, TsExpr::ident(validation_error)),
        then_body: vec![TsStmt::Expr(
            TsExpr::ident("res")
                .method("status", vec![TsExpr::Literal(TsLiteral::Int(400))])
                .method(
                    "json",
                    vec![TsExpr::Object(vec![ObjectEntry::Prop(
                        "message".into(),
                        err.clone().member("message"),
                    )])],
                ),
        )],
        else_body: Some(vec![TsStmt::Expr(TsExpr::ident("next").call(vec![err]))]),
    }];

    TsFunction {
        name,
        type_params: vec![],
        params: vec![
            TsParam::typed(SERVICE, service_ty.clone()),
            TsParam::typed("req", TsType::named("Request")),
            TsParam::typed("res", TsType::named("Response")),
            TsParam::typed("next", TsType::named("NextFunction")),
        ],
        return_type: Some(TsType::promise(TsType::primitive(TsPrimitive::Void))),
        body: vec![TsStmt::Try {
            body: stmts,
            catch_param: "err".into(),
            handler: on_error,
        }],
        is_async: true,
        is_export: true,
        is_arrow: false,
        doc: TsDoc::from_parts(Some(route.as_str()), method.deprecated),
    }
}

fn register(handler: &str, factory: &str, http: &HttpBinding) -> TsStmt {
    let dispatch = TsExpr::Arrow {
        params: vec![
            TsParam::untyped("req"),
            TsParam::untyped("res"),
            TsParam::untyped("next"),
        ],
        body: Box::new(TsExpr::ident(handler).call(vec![
            TsExpr::ident(factory).call(vec![TsExpr::ident("req")]),
            TsExpr::ident("req"),
            TsExpr::ident("res"),
            TsExpr::ident("next"),
        ])),
    };
    TsStmt::Expr(TsExpr::ident("router").method(
        http.verb.router_method(),
        vec![TsExpr::string(express_path(&http.path)), dispatch],
    ))
}

fn create_router(factories: Vec<TsParam>, registrations: Vec<TsStmt>) -> TsFunction {
    let mut body = vec![TsStmt::VarDecl {
        kind: VarKind::Const,
        name: "router".into(),
        ty: None,
        init: TsExpr::ident("Router").call(vec![]),
    }];
    body.extend(registrations);
    body.push(TsStmt::Return(Some(TsExpr::ident("router"))));
    TsFunction::exported("createRouter", factories, Some(TsType::named("Router")), body)
}
