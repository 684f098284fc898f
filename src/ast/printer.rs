//! Renders a parsed compilation unit back to declaration-level source.
//!
//! The output is Java-like, not byte-faithful: method bodies were skipped
//! during parsing and are rendered as `{}` stubs, and dropped initializers
//! stay dropped. Useful for tests and debugging.

use super::{CompUnit, Member, MethodDecl, Modifiers, TypeDecl, TypeKind, VarDecl};

pub struct AstPrinter {
    output: String,
    indent: usize,
}

impl AstPrinter {
    pub fn new() -> Self {
        Self { output: String::new(), indent: 0 }
    }

    pub fn print(&mut self, unit: &CompUnit) -> String {
        if let Some(package) = &unit.package {
            for annotation in &package.annotations {
                self.line(&annotation.to_string());
            }
            self.line(&package.to_string());
        }
        for import in &unit.imports {
            self.line(&import.to_string());
        }
        for decl in &unit.type_decls {
            self.print_type_decl(decl);
        }
        std::mem::take(&mut self.output)
    }

    fn print_type_decl(&mut self, decl: &TypeDecl) {
        for annotation in &decl.annotations {
            self.line(&annotation.to_string());
        }
        let mut header = String::new();
        push_modifiers(&mut header, decl.modifiers);
        header.push_str(&decl.to_string());
        if !decl.type_params.is_empty() {
            header.push('<');
            for (i, param) in decl.type_params.iter().enumerate() {
                if i > 0 {
                    header.push_str(", ");
                }
                header.push_str(&param.to_string());
            }
            header.push('>');
        }
        if let Some(extends) = &decl.extends {
            header.push_str(&format!(" extends {}", extends));
        }
        if !decl.implements.is_empty() {
            let keyword = if decl.kind == TypeKind::Interface { "extends" } else { "implements" };
            header.push_str(&format!(" {} ", keyword));
            for (i, interface) in decl.implements.iter().enumerate() {
                if i > 0 {
                    header.push_str(", ");
                }
                header.push_str(&interface.to_string());
            }
        }
        header.push_str(" {");
        self.line(&header);
        self.indent += 1;
        for member in &decl.members {
            match member {
                Member::Field(field) => self.print_field(field),
                Member::Method(method) => self.print_method(method),
                Member::Type(nested) => self.print_type_decl(nested),
            }
        }
        self.indent -= 1;
        self.line("}");
    }

    fn print_field(&mut self, field: &VarDecl) {
        let mut text = String::new();
        for annotation in &field.annotations {
            text.push_str(&annotation.to_string());
            text.push(' ');
        }
        push_modifiers(&mut text, field.modifiers);
        if field.modifiers.contains(Modifiers::ACC_ENUM) {
            // Enum constant: the type is the enclosing enum, not source text.
            text.push_str(&field.name);
            text.push(',');
        } else {
            text.push_str(&format!("{} {}", field.ty, field.name));
            if let Some(init) = &field.initializer {
                text.push_str(&format!(" = {}", init));
            }
            text.push(';');
        }
        self.line(&text);
    }

    fn print_method(&mut self, method: &MethodDecl) {
        let mut text = String::new();
        for annotation in &method.annotations {
            text.push_str(&annotation.to_string());
            text.push(' ');
        }
        push_modifiers(&mut text, method.modifiers);
        if !method.type_params.is_empty() {
            text.push('<');
            for (i, param) in method.type_params.iter().enumerate() {
                if i > 0 {
                    text.push_str(", ");
                }
                text.push_str(&param.to_string());
            }
            text.push_str("> ");
        }
        if let Some(return_type) = &method.return_type {
            text.push_str(&format!("{} ", return_type));
        }
        text.push_str(&method.name);
        text.push('(');
        for (i, param) in method.params.iter().enumerate() {
            if i > 0 {
                text.push_str(", ");
            }
            self.format_param(&mut text, param);
        }
        text.push(')');
        if !method.throws.is_empty() {
            text.push_str(" throws ");
            for (i, exception) in method.throws.iter().enumerate() {
                if i > 0 {
                    text.push_str(", ");
                }
                text.push_str(&exception.to_string());
            }
        }
        if let Some(default_value) = &method.default_value {
            text.push_str(&format!(" default {}", default_value));
        }
        text.push_str(if method.modifiers.contains(Modifiers::ABSTRACT) { ";" } else { " {}" });
        self.line(&text);
    }

    fn format_param(&self, text: &mut String, param: &VarDecl) {
        for annotation in &param.annotations {
            text.push_str(&annotation.to_string());
            text.push(' ');
        }
        push_modifiers(text, param.modifiers);
        if param.modifiers.contains(Modifiers::VARARGS) {
            // Varargs are stored as an array of the element type.
            if let super::Type::Array(array) = &param.ty {
                text.push_str(&format!("{}... {}", array.element, param.name));
                return;
            }
        }
        text.push_str(&format!("{} {}", param.ty, param.name));
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.indent {
            self.output.push_str("    ");
        }
        self.output.push_str(text);
        self.output.push('\n');
    }
}

impl Default for AstPrinter {
    fn default() -> Self {
        Self::new()
    }
}

fn push_modifiers(text: &mut String, modifiers: Modifiers) {
    for keyword in modifiers.keywords() {
        text.push_str(keyword);
        text.push(' ');
    }
}
