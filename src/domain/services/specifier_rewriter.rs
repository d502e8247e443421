//! Specifier rewriter
//!
//! Rewrites the module specifiers of import/export declarations so modules
//! keep resolving after they are relocated into the output package:
//!
//! 1. A specifier naming the package itself becomes an explicit relative path
//!    to the matching file under the configured base directory.
//! 2. Otherwise, a specifier naming a renamed package gets the new name, with
//!    any sub-path kept.
//! 3. Independently, a specifier containing the template directory marker but
//!    no template extension gets the extension appended. This is a lossy
//!    heuristic: at this stage there is no file identity to check against, so
//!    a non-template module living under a `templates/` directory is
//!    misnamed too.
//!
//! Only declarations are touched (`import … from`, `import '…'`,
//! `export … from`); dynamic `import()` calls and other code are left alone.
//! Files owned by the legacy bootstrap package additionally get every free
//! reference to the dynamic lookup identifier read off the global object.
//! Comments and string literals are never touched, and a module that binds
//! the identifier itself (declaration or parameter) is left as it is.

use std::borrow::Cow;
use std::collections::BTreeMap;

use regex::{Captures, Regex};

use crate::domain::value_objects::{path, RuntimeBridge};

/// Extensions of files the rewriter understands
const SCRIPT_EXTENSIONS: [&str; 3] = [".js", ".mjs", ".ts"];

/// A source-to-source pass applied to every module the build emits
pub trait ModuleTransform {
    /// Whether `relative_path` is a module this transform handles
    fn applies_to(&self, relative_path: &str) -> bool;

    /// Transform one module; `owner` is the package that contributed it
    fn transform<'a>(&self, owner: &str, relative_path: &str, source: &'a str) -> Cow<'a, str>;
}

/// Leaves every module unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTransform;

impl ModuleTransform for IdentityTransform {
    fn applies_to(&self, _relative_path: &str) -> bool {
        false
    }

    fn transform<'a>(&self, _owner: &str, _relative_path: &str, source: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(source)
    }
}

/// Options for one package's rewrite pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOptions {
    /// The package's own name
    pub own_name: String,
    /// Output-relative directory that self-references resolve into
    pub base_dir: String,
    /// Old package name → new package name
    pub renamed: BTreeMap<String, String>,
    /// Substring identifying template specifiers
    pub template_marker: String,
    /// Extension appended to template specifiers
    pub template_extension: String,
    /// Package whose modules get the global lookup rewrite
    pub bootstrap_package: Option<String>,
}

impl RewriteOptions {
    pub fn new(own_name: impl Into<String>) -> Self {
        Self {
            own_name: own_name.into(),
            base_dir: String::new(),
            renamed: BTreeMap::new(),
            template_marker: "/templates/".to_string(),
            template_extension: ".hbs".to_string(),
            bootstrap_package: None,
        }
    }

    pub fn with_base_dir(mut self, base_dir: impl Into<String>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    pub fn with_renamed(mut self, renamed: BTreeMap<String, String>) -> Self {
        self.renamed = renamed;
        self
    }

    pub fn with_bootstrap_package(mut self, package: impl Into<String>) -> Self {
        self.bootstrap_package = Some(package.into());
        self
    }
}

/// Regex-driven rewriter over import/export declarations
#[derive(Debug, Clone)]
pub struct SpecifierRewriter {
    options: RewriteOptions,
    bridge: RuntimeBridge,
    declaration: Regex,
    free_lookup: Regex,
    own_binding: Regex,
}

impl SpecifierRewriter {
    pub fn new(options: RewriteOptions, bridge: RuntimeBridge) -> Self {
        let declaration = Regex::new(
            r#"\b(?:(?:import|export)\b[^'";]*?\bfrom\s*|import\s*)['"](?P<spec>[^'"\n]+)['"]"#,
        )
        .expect("declaration pattern is valid");
        let ident = regex::escape(&bridge.require);
        let free_lookup = Regex::new(&format!(
            r"(?m)(?P<lead>^|[^.\w$])(?P<ident>{ident})\b"
        ))
        .expect("lookup pattern is valid");
        let own_binding = Regex::new(&format!(
            concat!(
                r"\b(?:var|let|const)\s+(?:[^;=]*[^.\w$])?{0}\b",
                r"|\bfunction\s+{0}\b",
                r"|\bfunction\b[^(]*\((?:[^)]*[^.\w$])?{0}\b[^)]*\)",
                r"|\((?:[^()]*[^.\w$])?{0}\b[^()]*\)\s*=>",
                r"|(?:^|[^.\w$]){0}\s*=>",
            ),
            ident
        ))
        .expect("binding pattern is valid");

        Self {
            options,
            bridge,
            declaration,
            free_lookup,
            own_binding,
        }
    }

    pub fn options(&self) -> &RewriteOptions {
        &self.options
    }

    /// Rewrite a single specifier as referenced from `relative_path`
    pub fn rewrite_specifier(&self, relative_path: &str, specifier: &str) -> String {
        let mut out = match split_package_name(specifier) {
            Some((name, rest)) if name == self.options.own_name => {
                let target = path::join(&self.options.base_dir, rest.trim_start_matches('/'));
                path::explicit_relative(path::parent(relative_path), &target)
            }
            Some((name, rest)) => match self.options.renamed.get(name) {
                Some(renamed) => format!("{renamed}{rest}"),
                None => specifier.to_string(),
            },
            None => specifier.to_string(),
        };

        if out.contains(&self.options.template_marker)
            && !out.ends_with(&self.options.template_extension)
        {
            out.push_str(&self.options.template_extension);
        }
        out
    }

    /// Rewrite every import/export declaration in a module
    pub fn rewrite_source<'a>(&self, relative_path: &str, source: &'a str) -> Cow<'a, str> {
        self.declaration.replace_all(source, |caps: &Captures<'_>| {
            let whole = caps.get(0).expect("group 0 always matches");
            let spec = caps.name("spec").expect("spec group always matches");
            let rewritten = self.rewrite_specifier(relative_path, spec.as_str());

            let start = spec.start() - whole.start();
            let end = spec.end() - whole.start();
            let text = whole.as_str();
            format!("{}{}{}", &text[..start], rewritten, &text[end..])
        })
    }

    /// Read every free reference to the lookup identifier off the global object
    pub fn rewrite_global_lookup<'a>(&self, source: &'a str) -> Cow<'a, str> {
        let code = mask_comments_and_strings(source);
        if self.own_binding.is_match(&code) {
            return Cow::Borrowed(source);
        }

        let qualified = self.bridge.qualified_require();
        let mut out = String::with_capacity(source.len());
        let mut last = 0;
        for caps in self.free_lookup.captures_iter(&code) {
            let Some(ident) = caps.name("ident") else {
                continue;
            };
            let after = code[ident.end()..].trim_start();
            // Object keys (`{ require: … }`) are not references
            if after.starts_with(':') && !after.starts_with("::") {
                continue;
            }
            out.push_str(&source[last..ident.start()]);
            out.push_str(&qualified);
            last = ident.end();
        }

        if last == 0 {
            return Cow::Borrowed(source);
        }
        out.push_str(&source[last..]);
        Cow::Owned(out)
    }
}

impl ModuleTransform for SpecifierRewriter {
    fn applies_to(&self, relative_path: &str) -> bool {
        SCRIPT_EXTENSIONS
            .iter()
            .any(|ext| relative_path.ends_with(ext))
    }

    fn transform<'a>(&self, owner: &str, relative_path: &str, source: &'a str) -> Cow<'a, str> {
        let rewritten = self.rewrite_source(relative_path, source);
        if self.options.bootstrap_package.as_deref() != Some(owner) {
            return rewritten;
        }
        match rewritten {
            Cow::Borrowed(s) => self.rewrite_global_lookup(s),
            Cow::Owned(s) => Cow::Owned(self.rewrite_global_lookup(&s).into_owned()),
        }
    }
}

/// Blank out comments and string literals, keeping every byte offset
///
/// Template literals are masked whole, `${…}` included. Regex literals are
/// not recognised.
fn mask_comments_and_strings(source: &str) -> String {
    #[derive(Clone, Copy, PartialEq)]
    enum State {
        Code,
        LineComment,
        BlockComment,
        Quoted(char),
    }

    let mut out = String::with_capacity(source.len());
    let mut state = State::Code;
    let mut chars = source.chars().peekable();
    let blank = |out: &mut String, c: char| {
        if c == '\n' {
            out.push('\n');
        } else {
            out.extend(std::iter::repeat(' ').take(c.len_utf8()));
        }
    };

    while let Some(c) = chars.next() {
        match state {
            State::Code => match c {
                '/' if chars.peek() == Some(&'/') => {
                    state = State::LineComment;
                    blank(&mut out, c);
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    state = State::BlockComment;
                    out.push_str("  ");
                }
                '\'' | '"' | '`' => {
                    state = State::Quoted(c);
                    out.push(c);
                }
                _ => out.push(c),
            },
            State::LineComment => {
                if c == '\n' {
                    state = State::Code;
                }
                blank(&mut out, c);
            }
            State::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    state = State::Code;
                    out.push_str("  ");
                } else {
                    blank(&mut out, c);
                }
            }
            State::Quoted(quote) => {
                if c == '\\' {
                    blank(&mut out, c);
                    if let Some(escaped) = chars.next() {
                        blank(&mut out, escaped);
                    }
                } else if c == quote {
                    state = State::Code;
                    out.push(c);
                } else {
                    blank(&mut out, c);
                }
            }
        }
    }
    out
}

/// Split a bare specifier into its package name and the remaining sub-path
///
/// Relative and absolute specifiers have no package name.
pub fn split_package_name(specifier: &str) -> Option<(&str, &str)> {
    if specifier.is_empty() || specifier.starts_with('.') || specifier.starts_with('/') {
        return None;
    }
    let name_end = if specifier.starts_with('@') {
        let scope_end = specifier.find('/')?;
        specifier[scope_end + 1..]
            .find('/')
            .map(|i| scope_end + 1 + i)
            .unwrap_or(specifier.len())
    } else {
        specifier.find('/').unwrap_or(specifier.len())
    };
    Some((&specifier[..name_end], &specifier[name_end..]))
}
