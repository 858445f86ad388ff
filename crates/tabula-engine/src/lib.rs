//! tabula_engine - Spreadsheet engine: cells, formulas and the dependency graph.

pub mod engine;
