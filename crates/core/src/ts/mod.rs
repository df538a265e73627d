//! TypeScript AST and printer.
//!
//! Renderers and mappers build [`types`] nodes; [`emit::Emit`] turns them
//! into source text in one fixed style (two-space indent, single quotes).

pub mod emit;
pub mod types;

pub use emit::Emit;
pub use types::{
    BinOp, ImportClause, ImportItem, ObjectEntry, SwitchCase, TemplatePart, TsDoc, TsExpr,
    TsFunction, TsImport, TsLiteral, TsMethodSig, TsModule, TsParam, TsPrimitive, TsProp, TsStmt,
    TsType, TsTypeDef, TypeDefKind, VarKind,
};
