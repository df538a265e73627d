//! TypeScript code emission via the Emit trait.
//!
//! This module provides a trait-based approach to converting TypeScript AST nodes
//! to string representations. Each AST type implements `Emit` for clean, composable
//! code generation.

use super::types::{
    BinOp, ImportClause, ImportItem, ObjectEntry, SwitchCase, TemplatePart, TsDoc, TsExpr,
    TsFunction, TsImport, TsLiteral, TsMethodSig, TsModule, TsParam, TsPrimitive, TsProp, TsStmt,
    TsType, TsTypeDef, TypeDefKind, VarKind,
};
use crate::names::{escape_js_string, quote_if_needed};

/// Trait for emitting TypeScript code from AST nodes.
pub trait Emit {
    /// Convert the AST node to its TypeScript string representation.
    fn emit(&self) -> String;
}

// =============================================================================
// Primitive Types
// =============================================================================

impl Emit for TsPrimitive {
    fn emit(&self) -> String {
        match self {
            TsPrimitive::String => "string".to_string(),
            TsPrimitive::Number => "number".to_string(),
            TsPrimitive::Boolean => "boolean".to_string(),
            TsPrimitive::Null => "null".to_string(),
            TsPrimitive::Undefined => "undefined".to_string(),
            TsPrimitive::Void => "void".to_string(),
            TsPrimitive::Unknown => "unknown".to_string(),
        }
    }
}

impl Emit for TsLiteral {
    fn emit(&self) -> String {
        match self {
            TsLiteral::String(s) => format!("'{}'", escape_js_string(s)),
            TsLiteral::Number(n) => n.to_string(),
            TsLiteral::Int(i) => i.to_string(),
            TsLiteral::Bool(b) => b.to_string(),
            TsLiteral::Null => "null".to_string(),
        }
    }
}

// =============================================================================
// Types
// =============================================================================

impl Emit for TsType {
    fn emit(&self) -> String {
        match self {
            TsType::Primitive(p) => p.emit(),
            TsType::Array(inner) => {
                let inner_str = inner.emit();
                // Wrap complex types in parentheses
                if matches!(**inner, TsType::Union(_) | TsType::Intersection(_)) {
                    format!("({inner_str})[]")
                } else {
                    format!("{inner_str}[]")
                }
            }
            TsType::Union(types) => types.iter().map(|t| t.emit()).collect::<Vec<_>>().join(" | "),
            TsType::Intersection(types) => types
                .iter()
                .map(|t| {
                    let s = t.emit();
                    if matches!(t, TsType::Union(_)) {
                        format!("({s})")
                    } else {
                        s
                    }
                })
                .collect::<Vec<_>>()
                .join(" & "),
            TsType::Object(props) => {
                if props.is_empty() {
                    "{}".to_string()
                } else if props.iter().any(|p| p.doc.is_some()) {
                    let mut output = "{\n".to_string();
                    for prop in props {
                        if let Some(doc) = &prop.doc {
                            output.push_str(&doc.emit_indented(1));
                        }
                        output.push_str(&format!("  {};\n", prop.emit()));
                    }
                    output.push('}');
                    output
                } else {
                    let parts: Vec<_> = props.iter().map(|p| p.emit()).collect();
                    format!("{{ {} }}", parts.join("; "))
                }
            }
            TsType::Record { key, value } => {
                format!("Record<{}, {}>", key.emit(), value.emit())
            }
            TsType::Generic { name, args } => {
                let args_str = args.iter().map(|a| a.emit()).collect::<Vec<_>>().join(", ");
                format!("{name}<{args_str}>")
            }
            TsType::Literal(lit) => lit.emit(),
            TsType::Ref(name) => name.clone(),
        }
    }
}

impl Emit for TsProp {
    fn emit(&self) -> String {
        let key = quote_if_needed(&self.name);
        let opt = if self.optional { "?" } else { "" };
        format!("{}{}: {}", key, opt, self.ty.emit())
    }
}

impl TsDoc {
    /// Emit as a JSDoc block at the given indentation (2 spaces per level).
    pub fn emit_indented(&self, indent: usize) -> String {
        let prefix = "  ".repeat(indent);
        let mut body: Vec<String> = self.lines.clone();
        if self.deprecated {
            body.push("@deprecated".to_string());
        }
        if body.len() == 1 {
            return format!("{prefix}/** {} */\n", body[0]);
        }
        let mut output = format!("{prefix}/**\n");
        for line in body {
            if line.is_empty() {
                output.push_str(&format!("{prefix} *\n"));
            } else {
                output.push_str(&format!("{prefix} * {line}\n"));
            }
        }
        output.push_str(&format!("{prefix} */\n"));
        output
    }
}

// =============================================================================
// Type Definitions
// =============================================================================

impl Emit for TsMethodSig {
    fn emit(&self) -> String {
        let params_str = self.params.iter().map(|p| p.emit()).collect::<Vec<_>>().join(", ");
        format!("{}({}): {}", self.name, params_str, self.return_type.emit())
    }
}

impl Emit for TsTypeDef {
    fn emit(&self) -> String {
        let mut output = self
            .doc
            .as_ref()
            .map(|d| d.emit_indented(0))
            .unwrap_or_default();
        match &self.kind {
            TypeDefKind::Interface {
                properties,
                methods,
            } => {
                output.push_str(&format!("export interface {} {{\n", self.name));
                for prop in properties {
                    if let Some(doc) = &prop.doc {
                        output.push_str(&doc.emit_indented(1));
                    }
                    output.push_str(&format!("  {};\n", prop.emit()));
                }
                for method in methods {
                    if let Some(doc) = &method.doc {
                        output.push_str(&doc.emit_indented(1));
                    }
                    output.push_str(&format!("  {};\n", method.emit()));
                }
                output.push_str("}\n");
            }
            TypeDefKind::TypeAlias { ty } => {
                output.push_str(&format!("export type {} = {};\n", self.name, ty.emit()));
            }
        }
        output
    }
}

// =============================================================================
// Expressions
// =============================================================================

impl Emit for BinOp {
    fn emit(&self) -> String {
        match self {
            BinOp::NotEqual => "!=".to_string(),
            BinOp::StrictEqual => "===".to_string(),
            BinOp::Or => "||".to_string(),
            BinOp::And => "&&".to_string(),
            BinOp::In => "in".to_string(),
            BinOp::InstanceOf => "instanceof".to_string(),
        }
    }
}

/// Emit an expression used as the object of a member access or call.
fn emit_target(expr: &TsExpr) -> String {
    let s = expr.emit();
    match expr {
        TsExpr::Ternary { .. }
        | TsExpr::BinOp { .. }
        | TsExpr::Arrow { .. }
        | TsExpr::Await(_)
        | TsExpr::TypeOf(_)
        | TsExpr::Cast { .. } => format!("({s})"),
        _ => s,
    }
}

/// Emit a binary operand, parenthesizing looser-binding children.
fn emit_operand(expr: &TsExpr, parent: BinOp) -> String {
    let s = expr.emit();
    match expr {
        TsExpr::BinOp { op, .. } if op.precedence() < parent.precedence() => format!("({s})"),
        TsExpr::Ternary { .. } | TsExpr::Arrow { .. } | TsExpr::Cast { .. } => format!("({s})"),
        _ => s,
    }
}

impl Emit for TsExpr {
    fn emit(&self) -> String {
        match self {
            TsExpr::Ident(name) => name.clone(),
            TsExpr::Literal(lit) => lit.emit(),
            TsExpr::Call { callee, args } => {
                let args_str = args.iter().map(|a| a.emit()).collect::<Vec<_>>().join(", ");
                format!("{}({})", emit_target(callee), args_str)
            }
            TsExpr::Arrow { params, body } => {
                let params_str = params.iter().map(|p| p.emit()).collect::<Vec<_>>().join(", ");
                let body_str = body.emit();
                if matches!(**body, TsExpr::Object(_)) {
                    format!("({params_str}) => ({body_str})")
                } else {
                    format!("({params_str}) => {body_str}")
                }
            }
            TsExpr::Object(entries) => {
                if entries.is_empty() {
                    "{}".to_string()
                } else {
                    let parts: Vec<_> = entries
                        .iter()
                        .map(|entry| match entry {
                            ObjectEntry::Prop(k, TsExpr::Ident(v)) if k == v => v.clone(),
                            ObjectEntry::Prop(k, v) => {
                                format!("{}: {}", quote_if_needed(k), v.emit())
                            }
                            ObjectEntry::Spread(e) => format!("...{}", emit_target(e)),
                        })
                        .collect();
                    format!("{{ {} }}", parts.join(", "))
                }
            }
            TsExpr::Member { object, prop } => {
                format!("{}.{}", emit_target(object), prop)
            }
            TsExpr::Index { object, index } => {
                format!("{}[{}]", emit_target(object), index.emit())
            }
            TsExpr::Template(parts) => {
                let content: String = parts
                    .iter()
                    .map(|p| match p {
                        TemplatePart::Static(s) => s.replace('`', "\\`"),
                        TemplatePart::Dynamic(e) => format!("${{{}}}", e.emit()),
                    })
                    .collect();
                format!("`{content}`")
            }
            TsExpr::Await(expr) => {
                format!("await {}", expr.emit())
            }
            TsExpr::New { callee, args } => {
                let args_str = args.iter().map(|a| a.emit()).collect::<Vec<_>>().join(", ");
                format!("new {}({})", emit_target(callee), args_str)
            }
            TsExpr::BinOp { left, op, right } => {
                format!(
                    "{} {} {}",
                    emit_operand(left, *op),
                    op.emit(),
                    emit_operand(right, *op)
                )
            }
            TsExpr::TypeOf(expr) => {
                format!("typeof {}", emit_target(expr))
            }
            TsExpr::Ternary {
                cond,
                then_expr,
                else_expr,
            } => {
                let cond_str = if matches!(**cond, TsExpr::Ternary { .. }) {
                    format!("({})", cond.emit())
                } else {
                    cond.emit()
                };
                format!("{} ? {} : {}", cond_str, then_expr.emit(), else_expr.emit())
            }
            TsExpr::Array(items) => {
                let items_str = items.iter().map(|i| i.emit()).collect::<Vec<_>>().join(", ");
                format!("[{items_str}]")
            }
            TsExpr::Cast { expr, ty } => {
                format!("{} as {}", emit_target(expr), ty.emit())
            }
            TsExpr::Raw(code) => code.clone(),
        }
    }
}

impl Emit for TsParam {
    fn emit(&self) -> String {
        let opt = if self.optional { "?" } else { "" };
        match &self.ty {
            Some(ty) => format!("{}{}: {}", self.name, opt, ty.emit()),
            None => format!("{}{}", self.name, opt),
        }
    }
}

// =============================================================================
// Statements
// =============================================================================

impl Emit for VarKind {
    fn emit(&self) -> String {
        match self {
            VarKind::Const => "const".to_string(),
            VarKind::Let => "let".to_string(),
        }
    }
}

impl Emit for TsStmt {
    fn emit(&self) -> String {
        self.emit_indented(1)
    }
}

fn emit_block(stmts: &[TsStmt], indent: usize) -> String {
    stmts.iter().map(|s| s.emit_indented(indent)).collect()
}

impl TsStmt {
    /// Emit with specified indentation level (2 spaces per level)
    pub fn emit_indented(&self, indent: usize) -> String {
        let prefix = "  ".repeat(indent);
        match self {
            TsStmt::VarDecl {
                kind,
                name,
                ty,
                init,
            } => {
                let ty_str = ty
                    .as_ref()
                    .map(|t| format!(": {}", t.emit()))
                    .unwrap_or_default();
                format!(
                    "{}{} {}{} = {};\n",
                    prefix,
                    kind.emit(),
                    name,
                    ty_str,
                    init.emit()
                )
            }
            TsStmt::Destructure {
                bindings,
                rest,
                init,
            } => {
                let mut parts: Vec<String> = bindings
                    .iter()
                    .map(|(key, local)| {
                        if key == local {
                            local.clone()
                        } else {
                            format!("{}: {}", quote_if_needed(key), local)
                        }
                    })
                    .collect();
                if let Some(rest) = rest {
                    parts.push(format!("...{rest}"));
                }
                format!(
                    "{}const {{ {} }} = {};\n",
                    prefix,
                    parts.join(", "),
                    init.emit()
                )
            }
            TsStmt::Expr(expr) => {
                format!("{}{};\n", prefix, expr.emit())
            }
            TsStmt::Return(expr) => match expr {
                Some(e) => format!("{}return {};\n", prefix, e.emit()),
                None => format!("{prefix}return;\n"),
            },
            TsStmt::If {
                cond,
                then_body,
                else_body,
            } => {
                let mut output = format!("{}if ({}) {{\n", prefix, cond.emit());
                output.push_str(&emit_block(then_body, indent + 1));
                let mut else_body = else_body.as_deref();
                // Fold `else { if ... }` into `else if ...`
                while let Some(stmts) = else_body {
                    if let [
                        TsStmt::If {
                            cond,
                            then_body,
                            else_body: nested,
                        },
                    ] = stmts
                    {
                        output.push_str(&format!("{}}} else if ({}) {{\n", prefix, cond.emit()));
                        output.push_str(&emit_block(then_body, indent + 1));
                        else_body = nested.as_deref();
                    } else {
                        output.push_str(&format!("{prefix}}} else {{\n"));
                        output.push_str(&emit_block(stmts, indent + 1));
                        else_body = None;
                    }
                }
                output.push_str(&format!("{prefix}}}\n"));
                output
            }
            TsStmt::Switch {
                discriminant,
                cases,
            } => {
                let mut output = format!("{}switch ({}) {{\n", prefix, discriminant.emit());
                for SwitchCase { test, body } in cases {
                    output.push_str(&format!("{}  case {}:\n", prefix, test.emit()));
                    output.push_str(&emit_block(body, indent + 2));
                }
                output.push_str(&format!("{prefix}}}\n"));
                output
            }
            TsStmt::Try {
                body,
                catch_param,
                handler,
            } => {
                let mut output = format!("{prefix}try {{\n");
                output.push_str(&emit_block(body, indent + 1));
                output.push_str(&format!("{prefix}}} catch ({catch_param}) {{\n"));
                output.push_str(&emit_block(handler, indent + 1));
                output.push_str(&format!("{prefix}}}\n"));
                output
            }
            TsStmt::Throw(expr) => {
                format!("{}throw {};\n", prefix, expr.emit())
            }
            TsStmt::Raw(code) => {
                // Raw code is emitted as-is, with proper indentation for each line
                code.lines()
                    .map(|line| {
                        if line.is_empty() {
                            "\n".to_string()
                        } else {
                            format!("{prefix}{line}\n")
                        }
                    })
                    .collect()
            }
        }
    }
}

// =============================================================================
// Functions
// =============================================================================

impl Emit for TsFunction {
    fn emit(&self) -> String {
        // Special case: empty name with Raw body = just emit the raw content
        // This is used for things like the ApiError class that don't fit the function AST
        if self.name.is_empty() {
            let mut output = String::new();
            for stmt in &self.body {
                if let TsStmt::Raw(code) = stmt {
                    output.push_str(code);
                    output.push('\n');
                } else {
                    output.push_str(&stmt.emit_indented(0));
                }
            }
            return output;
        }

        let mut output = self
            .doc
            .as_ref()
            .map(|d| d.emit_indented(0))
            .unwrap_or_default();

        // Export keyword
        if self.is_export {
            output.push_str("export ");
        }

        // Type parameters
        let type_params_str = if self.type_params.is_empty() {
            String::new()
        } else {
            format!("<{}>", self.type_params.join(", "))
        };

        // Parameters
        let params_str = self.params.iter().map(|p| p.emit()).collect::<Vec<_>>().join(", ");

        // Return type
        let return_type_str = self
            .return_type
            .as_ref()
            .map(|t| format!(": {}", t.emit()))
            .unwrap_or_default();

        // Async modifier
        let async_str = if self.is_async { "async " } else { "" };

        if self.is_arrow {
            // Arrow function: export const name = async (...): Type => { ... }
            output.push_str(&format!(
                "const {} = {}{}({}){}",
                self.name, async_str, type_params_str, params_str, return_type_str
            ));
            if self.body.is_empty() {
                output.push_str(" => {};\n");
            } else {
                output.push_str(" => {\n");
                output.push_str(&emit_block(&self.body, 1));
                output.push_str("};\n");
            }
        } else {
            // Regular function: export function name<T>(...): Type { ... }
            output.push_str(&format!(
                "{}function {}{}({}){}",
                async_str, self.name, type_params_str, params_str, return_type_str
            ));
            if self.body.is_empty() {
                output.push_str(" {}\n");
            } else {
                output.push_str(" {\n");
                output.push_str(&emit_block(&self.body, 1));
                output.push_str("}\n");
            }
        }

        output
    }
}

// =============================================================================
// Imports
// =============================================================================

impl Emit for ImportItem {
    fn emit(&self) -> String {
        match &self.alias {
            Some(alias) => format!("{} as {}", self.name, alias),
            None => self.name.clone(),
        }
    }
}

impl Emit for TsImport {
    fn emit(&self) -> String {
        let type_keyword = if self.type_only { "type " } else { "" };
        let clause = match &self.clause {
            ImportClause::Named(items) => {
                let items_str = items.iter().map(|i| i.emit()).collect::<Vec<_>>().join(", ");
                format!("{{ {items_str} }}")
            }
            ImportClause::Namespace(alias) => format!("* as {alias}"),
        };
        format!("import {}{} from '{}';\n", type_keyword, clause, self.from)
    }
}

// =============================================================================
// Module
// =============================================================================

impl Emit for TsModule {
    fn emit(&self) -> String {
        let mut output = String::new();

        for line in &self.banner {
            output.push_str(&format!("// {line}\n"));
        }
        if !self.banner.is_empty() {
            output.push('\n');
        }

        // Emit imports
        for import in &self.imports {
            output.push_str(&import.emit());
        }

        if !self.imports.is_empty() {
            output.push('\n');
        }

        // Emit type definitions
        for type_def in &self.types {
            output.push_str(&type_def.emit());
            output.push('\n');
        }

        // Emit functions
        for func in &self.functions {
            output.push_str(&func.emit());
            output.push('\n');
        }

        // Single trailing newline
        while output.ends_with("\n\n") {
            output.pop();
        }

        output
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_primitive() {
        assert_eq!(TsPrimitive::String.emit(), "string");
        assert_eq!(TsPrimitive::Number.emit(), "number");
        assert_eq!(TsPrimitive::Boolean.emit(), "boolean");
        assert_eq!(TsPrimitive::Null.emit(), "null");
        assert_eq!(TsPrimitive::Undefined.emit(), "undefined");
        assert_eq!(TsPrimitive::Unknown.emit(), "unknown");
    }

    #[test]
    fn test_emit_literal() {
        assert_eq!(TsLiteral::String("hello".into()).emit(), "'hello'");
        assert_eq!(TsLiteral::String("it's".into()).emit(), "'it\\'s'");
        assert_eq!(TsLiteral::Number(2.5).emit(), "2.5");
        assert_eq!(TsLiteral::Int(42).emit(), "42");
        assert_eq!(TsLiteral::Bool(true).emit(), "true");
        assert_eq!(TsLiteral::Null.emit(), "null");
    }

    #[test]
    fn test_emit_union_array() {
        // (string | null)[] - union inside array needs parens
        let inner = TsType::Union(vec![
            TsType::Primitive(TsPrimitive::String),
            TsType::Primitive(TsPrimitive::Null),
        ]);
        let ty = TsType::Array(Box::new(inner));
        assert_eq!(ty.emit(), "(string | null)[]");
    }

    #[test]
    fn test_emit_partial_record() {
        let ty = TsType::partial(TsType::Record {
            key: Box::new(TsType::Ref("Color".into())),
            value: Box::new(TsType::Primitive(TsPrimitive::Number)),
        });
        assert_eq!(ty.emit(), "Partial<Record<Color, number>>");
    }

    #[test]
    fn test_emit_intersection_parenthesizes_unions() {
        let ty = TsType::Intersection(vec![
            TsType::Object(vec![TsProp::new(
                "id",
                TsType::Primitive(TsPrimitive::String),
                false,
            )]),
            TsType::Record {
                key: Box::new(TsType::Primitive(TsPrimitive::String)),
                value: Box::new(TsType::Union(vec![
                    TsType::Primitive(TsPrimitive::String),
                    TsType::Primitive(TsPrimitive::Number),
                ])),
            },
        ]);
        assert_eq!(ty.emit(), "{ id: string } & Record<string, string | number>");
    }

    #[test]
    fn test_emit_object_type() {
        let ty = TsType::Object(vec![
            TsProp::new("id", TsType::Primitive(TsPrimitive::Number), false),
            TsProp::new("name", TsType::Primitive(TsPrimitive::String), true),
            TsProp::new("x-trace", TsType::Primitive(TsPrimitive::String), false),
        ]);
        assert_eq!(ty.emit(), "{ id: number; name?: string; 'x-trace': string }");
    }

    #[test]
    fn test_emit_documented_object_is_multiline() {
        let mut prop = TsProp::new("id", TsType::Primitive(TsPrimitive::String), false);
        prop.doc = TsDoc::from_parts(Some("Identifier"), false);
        let ty = TsType::Object(vec![prop]);
        assert_eq!(ty.emit(), "{\n  /** Identifier */\n  id: string;\n}");
    }

    #[test]
    fn test_emit_type_def_alias_with_doc() {
        let def = TsTypeDef {
            name: "Color".into(),
            kind: TypeDefKind::TypeAlias {
                ty: TsType::Union(vec![
                    TsType::Literal(TsLiteral::String("red".into())),
                    TsType::Literal(TsLiteral::String("green".into())),
                ]),
            },
            doc: TsDoc::from_parts(Some("Paint colors"), true),
        };
        assert_eq!(
            def.emit(),
            "/**\n * Paint colors\n * @deprecated\n */\nexport type Color = 'red' | 'green';\n"
        );
    }

    #[test]
    fn test_emit_interface_with_methods() {
        let def = TsTypeDef {
            name: "WidgetService".into(),
            kind: TypeDefKind::Interface {
                properties: vec![],
                methods: vec![TsMethodSig {
                    name: "getWidget".into(),
                    params: vec![TsParam::typed("params", TsType::Ref("{ id: string }".into()))],
                    return_type: TsType::promise(TsType::Ref("Widget".into())),
                    doc: None,
                }],
            },
            doc: None,
        };
        assert_eq!(
            def.emit(),
            "export interface WidgetService {\n  getWidget(params: { id: string }): Promise<Widget>;\n}\n"
        );
    }

    #[test]
    fn test_emit_guard_expression() {
        let acc = TsExpr::ident("obj").member("propA");
        let expr = TsExpr::ternary(
            TsExpr::bin(
                acc.clone().type_is("undefined"),
                BinOp::Or,
                TsExpr::bin(acc.clone(), BinOp::StrictEqual, TsExpr::Literal(TsLiteral::Null)),
            ),
            acc.clone(),
            TsExpr::new_of("Date", vec![acc]),
        );
        assert_eq!(
            expr.emit(),
            "typeof obj.propA === 'undefined' || obj.propA === null ? obj.propA : new Date(obj.propA)"
        );
    }

    #[test]
    fn test_emit_parenthesizes_looser_operands() {
        let expr = TsExpr::bin(
            TsExpr::bin(TsExpr::ident("a"), BinOp::Or, TsExpr::ident("b")),
            BinOp::And,
            TsExpr::ident("c"),
        );
        assert_eq!(expr.emit(), "(a || b) && c");
    }

    #[test]
    fn test_emit_arrow_returning_object() {
        let expr = TsExpr::arrow(
            "x",
            TsExpr::Object(vec![ObjectEntry::Prop("a".into(), TsExpr::ident("x"))]),
        );
        assert_eq!(expr.emit(), "(x) => ({ a: x })");
    }

    #[test]
    fn test_emit_else_if_chain() {
        let stmt = TsStmt::If {
            cond: TsExpr::ident("a"),
            then_body: vec![TsStmt::Return(Some(TsExpr::ident("x")))],
            else_body: Some(vec![TsStmt::If {
                cond: TsExpr::ident("b"),
                then_body: vec![TsStmt::Return(Some(TsExpr::ident("y")))],
                else_body: Some(vec![TsStmt::Return(Some(TsExpr::ident("z")))]),
            }]),
        };
        assert_eq!(
            stmt.emit_indented(0),
            "if (a) {\n  return x;\n} else if (b) {\n  return y;\n} else {\n  return z;\n}\n"
        );
    }

    #[test]
    fn test_emit_switch() {
        let stmt = TsStmt::Switch {
            discriminant: TsExpr::ident("dto").member("type"),
            cases: vec![SwitchCase {
                test: TsLiteral::String("cat".into()),
                body: vec![TsStmt::Return(Some(TsExpr::ident("c")))],
            }],
        };
        assert_eq!(
            stmt.emit_indented(0),
            "switch (dto.type) {\n  case 'cat':\n    return c;\n}\n"
        );
    }

    #[test]
    fn test_emit_destructure() {
        let stmt = TsStmt::Destructure {
            bindings: vec![
                ("id".into(), "id".into()),
                ("created_at".into(), "createdAt".into()),
                ("x-key".into(), "xKey".into()),
            ],
            rest: Some("rest".into()),
            init: TsExpr::ident("dto"),
        };
        assert_eq!(
            stmt.emit_indented(0),
            "const { id, created_at: createdAt, 'x-key': xKey, ...rest } = dto;\n"
        );
    }

    #[test]
    fn test_emit_namespace_import() {
        let import = TsImport {
            clause: ImportClause::Namespace("types".into()),
            from: "./types".into(),
            type_only: true,
        };
        assert_eq!(import.emit(), "import type * as types from './types';\n");
    }

    #[test]
    fn test_emit_named_import() {
        let import = TsImport {
            clause: ImportClause::Named(vec![
                ImportItem {
                    name: "ZodError".into(),
                    alias: None,
                },
                ImportItem {
                    name: "z".into(),
                    alias: Some("zod".into()),
                },
            ]),
            from: "zod".into(),
            type_only: false,
        };
        assert_eq!(import.emit(), "import { ZodError, z as zod } from 'zod';\n");
    }

    #[test]
    fn test_emit_regular_function() {
        let func = TsFunction::exported(
            "mapFromWidgetDto",
            vec![TsParam::typed("dto", TsType::Ref("dtos.WidgetDto".into()))],
            Some(TsType::Ref("types.Widget".into())),
            vec![TsStmt::Return(Some(TsExpr::ident("dto")))],
        );
        assert_eq!(
            func.emit(),
            "export function mapFromWidgetDto(dto: dtos.WidgetDto): types.Widget {\n  return dto;\n}\n"
        );
    }

    #[test]
    fn test_emit_module_trims_trailing_blank_lines() {
        let module = TsModule {
            banner: vec!["Generated file.".into()],
            functions: vec![TsFunction::raw("export const x = 1;")],
            ..TsModule::default()
        };
        assert_eq!(module.emit(), "// Generated file.\n\nexport const x = 1;\n");
    }
}
