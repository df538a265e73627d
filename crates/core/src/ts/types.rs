//! TypeScript IR types for code generation.
//!
//! This module defines the TypeScript representation the renderers build:
//! - TsType: Types (primitives, arrays, unions, objects, records, etc.)
//! - TsExpr: Expressions (identifiers, calls, arrows, ternaries, etc.)
//! - TsStmt / TsFunction / TsTypeDef / TsModule: declarations and files

/// TypeScript type representation
#[derive(Debug, Clone, PartialEq)]
pub enum TsType {
    /// Primitive types: string, number, boolean, null, undefined, void, unknown
    Primitive(TsPrimitive),
    /// Array type: T[]
    Array(Box<TsType>),
    /// Union type: A | B | C
    Union(Vec<TsType>),
    /// Intersection type: A & B & C
    Intersection(Vec<TsType>),
    /// Object type: { foo: string; bar?: number }
    Object(Vec<TsProp>),
    /// Record type: Record<K, V>
    Record {
        /// Key type.
        key: Box<TsType>,
        /// Value type.
        value: Box<TsType>,
    },
    /// Generic application: Partial<T>, Promise<T>
    Generic {
        /// Generic type name.
        name: String,
        /// Type arguments.
        args: Vec<TsType>,
    },
    /// Literal type: 'foo', 42, true
    Literal(TsLiteral),
    /// Named type reference, already qualified: `Widget`, `dtos.WidgetDto`
    Ref(String),
}

impl TsType {
    /// Shorthand for a primitive type.
    pub fn primitive(p: TsPrimitive) -> Self {
        TsType::Primitive(p)
    }

    /// Shorthand for a named reference.
    pub fn named(name: impl Into<String>) -> Self {
        TsType::Ref(name.into())
    }

    /// Wrap in `Promise<T>`.
    pub fn promise(inner: TsType) -> Self {
        TsType::Generic {
            name: "Promise".into(),
            args: vec![inner],
        }
    }

    /// Wrap in `Partial<T>`.
    pub fn partial(inner: TsType) -> Self {
        TsType::Generic {
            name: "Partial".into(),
            args: vec![inner],
        }
    }

    /// Build a union, flattening nested unions and dropping duplicates while
    /// keeping first-seen order. A single member is returned unwrapped.
    pub fn union_of(types: impl IntoIterator<Item = TsType>) -> Self {
        let mut members: Vec<TsType> = Vec::new();
        for ty in types {
            let parts = match ty {
                TsType::Union(inner) => inner,
                other => vec![other],
            };
            for part in parts {
                if !members.contains(&part) {
                    members.push(part);
                }
            }
        }
        if members.len() == 1 {
            members.remove(0)
        } else {
            TsType::Union(members)
        }
    }
}

/// TypeScript primitive types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TsPrimitive {
    /// string
    String,
    /// number
    Number,
    /// boolean
    Boolean,
    /// null
    Null,
    /// undefined
    Undefined,
    /// void
    Void,
    /// unknown
    Unknown,
}

/// Object property definition
#[derive(Debug, Clone, PartialEq)]
pub struct TsProp {
    /// Property key, quoted on emission when needed.
    pub name: String,
    /// Property type.
    pub ty: TsType,
    /// Rendered with a `?` marker.
    pub optional: bool,
    /// JSDoc for the property.
    pub doc: Option<TsDoc>,
}

impl TsProp {
    /// An undocumented property.
    pub fn new(name: impl Into<String>, ty: TsType, optional: bool) -> Self {
        Self {
            name: name.into(),
            ty,
            optional,
            doc: None,
        }
    }
}

/// JSDoc block attached to a declaration or property.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TsDoc {
    /// Description lines.
    pub lines: Vec<String>,
    /// Adds a `@deprecated` tag.
    pub deprecated: bool,
}

impl TsDoc {
    /// Build a doc block from an optional description; `None` when there is
    /// nothing to say.
    pub fn from_parts(description: Option<&str>, deprecated: bool) -> Option<Self> {
        let lines: Vec<String> = description
            .map(|d| d.lines().map(|l| l.trim_end().to_string()).collect())
            .unwrap_or_default();
        if lines.is_empty() && !deprecated {
            None
        } else {
            Some(Self { lines, deprecated })
        }
    }
}

/// TypeScript literal values
#[derive(Debug, Clone, PartialEq)]
pub enum TsLiteral {
    /// 'text'
    String(String),
    /// 1.5
    Number(f64),
    /// 42
    Int(i64),
    /// true / false
    Bool(bool),
    /// null
    Null,
}

/// TypeScript expression
#[derive(Debug, Clone, PartialEq)]
pub enum TsExpr {
    /// Identifier: foo
    Ident(String),
    /// Literal value: 'bar', 42
    Literal(TsLiteral),
    /// Function call: foo(a, b)
    Call {
        /// Called expression.
        callee: Box<TsExpr>,
        /// Arguments.
        args: Vec<TsExpr>,
    },
    /// Arrow function: (x) => x.foo
    Arrow {
        /// Parameters.
        params: Vec<TsParam>,
        /// Expression body.
        body: Box<TsExpr>,
    },
    /// Object literal: { a: 1, ...rest }
    Object(Vec<ObjectEntry>),
    /// Member access: foo.bar
    Member {
        /// Accessed object.
        object: Box<TsExpr>,
        /// Property name (a valid identifier).
        prop: String,
    },
    /// Index/bracket access: obj['foo-bar']
    Index {
        /// Accessed object.
        object: Box<TsExpr>,
        /// Index expression.
        index: Box<TsExpr>,
    },
    /// Template literal: `${foo}/bar`
    Template(Vec<TemplatePart>),
    /// Await expression: await fetch()
    Await(Box<TsExpr>),
    /// new Date(...)
    New {
        /// Constructor.
        callee: Box<TsExpr>,
        /// Arguments.
        args: Vec<TsExpr>,
    },
    /// Binary operation: a === b
    BinOp {
        /// Left operand.
        left: Box<TsExpr>,
        /// Operator.
        op: BinOp,
        /// Right operand.
        right: Box<TsExpr>,
    },
    /// typeof x
    TypeOf(Box<TsExpr>),
    /// Ternary/conditional: cond ? a : b
    Ternary {
        /// Condition.
        cond: Box<TsExpr>,
        /// Value when true.
        then_expr: Box<TsExpr>,
        /// Value when false.
        else_expr: Box<TsExpr>,
    },
    /// Array literal: [a, b, c]
    Array(Vec<TsExpr>),
    /// Type cast: expr as Type
    Cast {
        /// Cast expression.
        expr: Box<TsExpr>,
        /// Target type.
        ty: TsType,
    },
    /// Raw code that doesn't fit the AST
    Raw(String),
}

/// Entry of an object literal.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectEntry {
    /// key: value
    Prop(String, TsExpr),
    /// ...expr
    Spread(TsExpr),
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    /// !=
    NotEqual,
    /// ===
    StrictEqual,
    /// ||
    Or,
    /// &&
    And,
    /// in
    In,
    /// instanceof
    InstanceOf,
}

impl BinOp {
    /// Binding strength; higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinOp::Or => 1,
            BinOp::And => 2,
            BinOp::NotEqual | BinOp::StrictEqual => 3,
            BinOp::In | BinOp::InstanceOf => 4,
        }
    }
}

impl TsExpr {
    /// Identifier expression.
    pub fn ident(name: impl Into<String>) -> Self {
        TsExpr::Ident(name.into())
    }

    /// String literal expression.
    pub fn string(value: impl Into<String>) -> Self {
        TsExpr::Literal(TsLiteral::String(value.into()))
    }

    /// `self.prop`, switching to `self['prop']` when `prop` is not a valid
    /// identifier.
    pub fn member(self, prop: &str) -> Self {
        if crate::names::needs_bracket_notation(prop) {
            TsExpr::Index {
                object: Box::new(self),
                index: Box::new(TsExpr::string(prop)),
            }
        } else {
            TsExpr::Member {
                object: Box::new(self),
                prop: prop.to_string(),
            }
        }
    }

    /// `self(args)`.
    pub fn call(self, args: Vec<TsExpr>) -> Self {
        TsExpr::Call {
            callee: Box::new(self),
            args,
        }
    }

    /// `self.method(args)`.
    pub fn method(self, method: &str, args: Vec<TsExpr>) -> Self {
        self.member(method).call(args)
    }

    /// `left op right`.
    pub fn bin(left: TsExpr, op: BinOp, right: TsExpr) -> Self {
        TsExpr::BinOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    /// `cond ? then_expr : else_expr`.
    pub fn ternary(cond: TsExpr, then_expr: TsExpr, else_expr: TsExpr) -> Self {
        TsExpr::Ternary {
            cond: Box::new(cond),
            then_expr: Box::new(then_expr),
            else_expr: Box::new(else_expr),
        }
    }

    /// `typeof self === 'kind'`.
    pub fn type_is(self, kind: &str) -> Self {
        TsExpr::bin(
            TsExpr::TypeOf(Box::new(self)),
            BinOp::StrictEqual,
            TsExpr::string(kind),
        )
    }

    /// `(param) => body`.
    pub fn arrow(param: &str, body: TsExpr) -> Self {
        TsExpr::Arrow {
            params: vec![TsParam::untyped(param)],
            body: Box::new(body),
        }
    }

    /// `new callee(args)`.
    pub fn new_of(callee: &str, args: Vec<TsExpr>) -> Self {
        TsExpr::New {
            callee: Box::new(TsExpr::ident(callee)),
            args,
        }
    }
}

/// Function parameter
#[derive(Debug, Clone, PartialEq)]
pub struct TsParam {
    /// Parameter name.
    pub name: String,
    /// Annotation, omitted when `None`.
    pub ty: Option<TsType>,
    /// Rendered with a `?` marker.
    pub optional: bool,
}

impl TsParam {
    /// A required, annotated parameter.
    pub fn typed(name: impl Into<String>, ty: TsType) -> Self {
        Self {
            name: name.into(),
            ty: Some(ty),
            optional: false,
        }
    }

    /// A parameter without annotation.
    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: None,
            optional: false,
        }
    }
}

/// Template literal part
#[derive(Debug, Clone, PartialEq)]
pub enum TemplatePart {
    /// Static string part
    Static(String),
    /// Dynamic expression part: ${expr}
    Dynamic(TsExpr),
}

// =============================================================================
// Module-Level IR (for printer)
// =============================================================================

/// Import statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TsImport {
    /// What is imported
    pub clause: ImportClause,
    /// Module path
    pub from: String,
    /// Whether this is a type-only import
    pub type_only: bool,
}

/// Import clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportClause {
    /// import { a, b as c } from '...'
    Named(Vec<ImportItem>),
    /// import * as alias from '...'
    Namespace(String),
}

/// Import item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportItem {
    /// Exported name.
    pub name: String,
    /// Local alias.
    pub alias: Option<String>,
}

/// Method signature inside an interface declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct TsMethodSig {
    /// Method name.
    pub name: String,
    /// Parameters.
    pub params: Vec<TsParam>,
    /// Return type.
    pub return_type: TsType,
    /// JSDoc for the method.
    pub doc: Option<TsDoc>,
}

/// Type definition kind
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDefKind {
    /// interface Foo { ... }
    Interface {
        /// Property members.
        properties: Vec<TsProp>,
        /// Method members.
        methods: Vec<TsMethodSig>,
    },
    /// type Foo = ...
    TypeAlias {
        /// Aliased type.
        ty: TsType,
    },
}

/// Type definition
#[derive(Debug, Clone, PartialEq)]
pub struct TsTypeDef {
    /// Declared name.
    pub name: String,
    /// Declaration body.
    pub kind: TypeDefKind,
    /// JSDoc for the declaration.
    pub doc: Option<TsDoc>,
}

/// Statement in a function body
#[derive(Debug, Clone, PartialEq)]
pub enum TsStmt {
    /// const/let declaration
    VarDecl {
        /// const or let.
        kind: VarKind,
        /// Bound name.
        name: String,
        /// Annotation.
        ty: Option<TsType>,
        /// Initializer.
        init: TsExpr,
    },
    /// const { key: local, ...rest } = init
    Destructure {
        /// (property key, local binding) pairs.
        bindings: Vec<(String, String)>,
        /// Name bound to the remaining keys.
        rest: Option<String>,
        /// Destructured expression.
        init: TsExpr,
    },
    /// Expression statement
    Expr(TsExpr),
    /// Return statement
    Return(Option<TsExpr>),
    /// If statement; an else body holding a single `If` renders as `else if`
    If {
        /// Condition.
        cond: TsExpr,
        /// Statements when true.
        then_body: Vec<TsStmt>,
        /// Statements when false.
        else_body: Option<Vec<TsStmt>>,
    },
    /// switch (discriminant) { case ...: }
    Switch {
        /// Switched expression.
        discriminant: TsExpr,
        /// Cases in order.
        cases: Vec<SwitchCase>,
    },
    /// try { ... } catch (param) { ... }
    Try {
        /// Guarded statements.
        body: Vec<TsStmt>,
        /// Catch binding.
        catch_param: String,
        /// Handler statements.
        handler: Vec<TsStmt>,
    },
    /// Throw statement
    Throw(TsExpr),
    /// Raw code block (for complex patterns that don't fit the AST)
    Raw(String),
}

/// One `case` arm.
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    /// Matched literal.
    pub test: TsLiteral,
    /// Arm statements.
    pub body: Vec<TsStmt>,
}

/// Variable declaration kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    /// const
    Const,
    /// let
    Let,
}

/// Function definition
#[derive(Debug, Clone, PartialEq)]
pub struct TsFunction {
    /// Function name; empty for raw blocks.
    pub name: String,
    /// Generic parameters, already rendered.
    pub type_params: Vec<String>,
    /// Parameters.
    pub params: Vec<TsParam>,
    /// Return annotation.
    pub return_type: Option<TsType>,
    /// Body statements.
    pub body: Vec<TsStmt>,
    /// async modifier.
    pub is_async: bool,
    /// export modifier.
    pub is_export: bool,
    /// `const name = (...) => {}` instead of `function name(...) {}`.
    pub is_arrow: bool,
    /// JSDoc for the function.
    pub doc: Option<TsDoc>,
}

impl TsFunction {
    /// An exported, synchronous `function` declaration.
    pub fn exported(
        name: impl Into<String>,
        params: Vec<TsParam>,
        return_type: Option<TsType>,
        body: Vec<TsStmt>,
    ) -> Self {
        Self {
            name: name.into(),
            type_params: vec![],
            params,
            return_type,
            body,
            is_async: false,
            is_export: true,
            is_arrow: false,
            doc: None,
        }
    }

    /// A block emitted verbatim (classes, helpers that don't fit the AST).
    pub fn raw(code: impl Into<String>) -> Self {
        Self {
            name: String::new(),
            type_params: vec![],
            params: vec![],
            return_type: None,
            body: vec![TsStmt::Raw(code.into())],
            is_async: false,
            is_export: false,
            is_arrow: false,
            doc: None,
        }
    }
}

/// Complete TypeScript module
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TsModule {
    /// Leading comment lines.
    pub banner: Vec<String>,
    /// Import block.
    pub imports: Vec<TsImport>,
    /// Type declarations.
    pub types: Vec<TsTypeDef>,
    /// Functions and raw blocks.
    pub functions: Vec<TsFunction>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_of_flattens_and_dedupes() {
        let ty = TsType::union_of([
            TsType::primitive(TsPrimitive::String),
            TsType::Union(vec![
                TsType::primitive(TsPrimitive::Number),
                TsType::primitive(TsPrimitive::String),
            ]),
        ]);
        assert_eq!(
            ty,
            TsType::Union(vec![
                TsType::primitive(TsPrimitive::String),
                TsType::primitive(TsPrimitive::Number),
            ])
        );
    }

    #[test]
    fn test_union_of_single_member_unwraps() {
        let ty = TsType::union_of([TsType::named("Widget"), TsType::named("Widget")]);
        assert_eq!(ty, TsType::named("Widget"));
    }

    #[test]
    fn test_member_switches_to_brackets() {
        let expr = TsExpr::ident("dto").member("created-at");
        assert!(matches!(expr, TsExpr::Index { .. }));
        let expr = TsExpr::ident("dto").member("createdAt");
        assert!(matches!(expr, TsExpr::Member { .. }));
    }

    #[test]
    fn test_doc_from_parts() {
        assert_eq!(TsDoc::from_parts(None, false), None);
        let doc = TsDoc::from_parts(Some("A widget.\nSecond line. "), true).unwrap_or_default();
        assert_eq!(doc.lines, vec!["A widget.", "Second line."]);
        assert!(doc.deprecated);
    }
}
