//! Tree-sitter parser management
//!
//! Manages parsers for the supported application-source languages.

use std::collections::HashMap;
use tree_sitter::{Parser, Tree};

/// Supported source languages for entity extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    TypeScript,
    Tsx,
    JavaScript,
    Jsx,
}

impl Language {
    /// Detect language from file path extension
    pub fn from_path(path: &str) -> Option<Self> {
        let ext = path.rsplit('.').next()?;
        match ext.to_lowercase().as_str() {
            "ts" => Some(Language::TypeScript),
            "tsx" => Some(Language::Tsx),
            "js" | "mjs" | "cjs" => Some(Language::JavaScript),
            "jsx" => Some(Language::Jsx),
            _ => None,
        }
    }

    /// Get display name for the language
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::TypeScript => "TypeScript",
            Language::Tsx => "TSX",
            Language::JavaScript => "JavaScript",
            Language::Jsx => "JSX",
        }
    }
}

/// Error type for tree-sitter operations
#[derive(Debug)]
pub enum TreeSitterError {
    UnsupportedLanguage,
    ParseFailed,
    LanguageInitFailed(String),
}

impl std::fmt::Display for TreeSitterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TreeSitterError::UnsupportedLanguage => write!(f, "Unsupported language"),
            TreeSitterError::ParseFailed => write!(f, "Failed to parse code"),
            TreeSitterError::LanguageInitFailed(msg) => {
                write!(f, "Failed to initialize language: {}", msg)
            }
        }
    }
}

impl std::error::Error for TreeSitterError {}

/// Tree-sitter parser manager
///
/// Holds one configured parser per supported language.
pub struct TreeSitterParser {
    parsers: HashMap<Language, Parser>,
}

impl TreeSitterParser {
    /// Create a new parser manager with all supported languages initialized
    pub fn new() -> Result<Self, TreeSitterError> {
        let mut parsers = HashMap::new();

        let mut ts_parser = Parser::new();
        ts_parser
            .set_language(&tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into())
            .map_err(|e| TreeSitterError::LanguageInitFailed(e.to_string()))?;
        parsers.insert(Language::TypeScript, ts_parser);

        let mut tsx_parser = Parser::new();
        tsx_parser
            .set_language(&tree_sitter_typescript::LANGUAGE_TSX.into())
            .map_err(|e| TreeSitterError::LanguageInitFailed(e.to_string()))?;
        parsers.insert(Language::Tsx, tsx_parser);

        let mut js_parser = Parser::new();
        js_parser
            .set_language(&tree_sitter_javascript::LANGUAGE.into())
            .map_err(|e| TreeSitterError::LanguageInitFailed(e.to_string()))?;
        parsers.insert(Language::JavaScript, js_parser);

        // JSX uses the same grammar as JavaScript in tree-sitter-javascript
        let mut jsx_parser = Parser::new();
        jsx_parser
            .set_language(&tree_sitter_javascript::LANGUAGE.into())
            .map_err(|e| TreeSitterError::LanguageInitFailed(e.to_string()))?;
        parsers.insert(Language::Jsx, jsx_parser);

        Ok(Self { parsers })
    }

    /// Parse source code for the given language
    pub fn parse(&mut self, code: &str, language: Language) -> Result<Tree, TreeSitterError> {
        let parser = self
            .parsers
            .get_mut(&language)
            .ok_or(TreeSitterError::UnsupportedLanguage)?;

        parser.parse(code, None).ok_or(TreeSitterError::ParseFailed)
    }

    /// Check if a language is supported
    pub fn supports_language(&self, language: Language) -> bool {
        self.parsers.contains_key(&language)
    }
}
