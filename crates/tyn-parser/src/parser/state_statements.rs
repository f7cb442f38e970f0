//! Parser state - top-level declarations and class/interface bodies

use super::state::ParserState;
use crate::ast::*;
use tyn_common::Span;
use tyn_common::diagnostics::diagnostic_codes;
use tyn_scanner::SyntaxKind;

impl ParserState {
    pub(crate) fn parse_source_file(&mut self) -> SourceFile {
        let mut declarations = Vec::new();
        while !self.is_token(SyntaxKind::EndOfFileToken) {
            let before = self.token_pos();
            match self.parse_declaration() {
                Some(decl) => declarations.push(decl),
                None => {
                    if self.token_pos() == before && !self.is_token(SyntaxKind::EndOfFileToken) {
                        self.recover_to_next_declaration();
                    }
                }
            }
        }
        tracing::debug!(
            file = %self.file_name,
            declarations = declarations.len(),
            "parsed source file"
        );
        SourceFile {
            file_name: self.file_name.clone(),
            declarations,
        }
    }

    fn is_declaration_start(&self) -> bool {
        matches!(
            self.current_token,
            SyntaxKind::TypeKeyword
                | SyntaxKind::InterfaceKeyword
                | SyntaxKind::ClassKeyword
                | SyntaxKind::DeclareKeyword
                | SyntaxKind::FunctionKeyword
                | SyntaxKind::ConstKeyword
        ) || (self.is_token(SyntaxKind::Identifier) && self.token_text() == "export")
    }

    /// Report TS1128 once and skip to the next line that starts a declaration.
    fn recover_to_next_declaration(&mut self) {
        self.error_at_current(diagnostic_codes::DECLARATION_EXPECTED, &[]);
        let mut consumed = 0u32;
        loop {
            match self.current_token {
                SyntaxKind::EndOfFileToken => return,
                SyntaxKind::OpenBraceToken => self.skip_block(),
                SyntaxKind::OpenParenToken => {
                    self.skip_balanced(SyntaxKind::OpenParenToken, SyntaxKind::CloseParenToken)
                }
                _ => {
                    self.next_token();
                }
            }
            consumed += 1;
            if consumed > tyn_common::limits::MAX_RECOVERY_TOKENS {
                return;
            }
            if self.scanner.has_preceding_line_break() && self.is_declaration_start() {
                return;
            }
        }
    }

    fn parse_declaration(&mut self) -> Option<Declaration> {
        let start = self.token_pos();
        if self.is_token(SyntaxKind::Identifier) && self.token_text() == "export" {
            self.next_token();
        }
        let declare = self.parse_optional(SyntaxKind::DeclareKeyword);

        match self.current_token {
            SyntaxKind::TypeKeyword => self.parse_type_alias(start),
            SyntaxKind::InterfaceKeyword => self.parse_interface(start),
            SyntaxKind::ClassKeyword => self.parse_class(start),
            SyntaxKind::FunctionKeyword => self.parse_function(start),
            SyntaxKind::ConstKeyword => self.parse_const(start),
            _ if declare || self.token_pos() != start => {
                self.error_expected("declaration");
                None
            }
            _ => None,
        }
    }

    /// `type Name = Type;`
    fn parse_type_alias(&mut self, start: u32) -> Option<Declaration> {
        self.next_token();
        let name = self.parse_identifier_name(false);
        // Generic aliases are not supported; parameters are parsed and dropped
        // so the body reports their names as unresolved.
        self.parse_type_parameters();
        self.parse_expected(SyntaxKind::EqualsToken);
        let type_node = self.parse_type();
        self.parse_semicolon();
        Some(Declaration::TypeAlias(TypeAliasDecl {
            name,
            type_node,
            span: self.span_from(start),
        }))
    }

    /// `interface Name { members }`
    fn parse_interface(&mut self, start: u32) -> Option<Declaration> {
        self.next_token();
        let name = self.parse_identifier_name(false);
        self.parse_type_parameters();
        let members = self.parse_object_type_members();
        Some(Declaration::Interface(InterfaceDecl {
            name,
            members,
            span: self.span_from(start),
        }))
    }

    /// `class Name { members }`; heritage clauses are skipped.
    fn parse_class(&mut self, start: u32) -> Option<Declaration> {
        self.next_token();
        let name = self.parse_identifier_name(false);
        self.parse_type_parameters();
        while !matches!(
            self.current_token,
            SyntaxKind::OpenBraceToken | SyntaxKind::EndOfFileToken
        ) {
            self.next_token();
        }
        let mut members = Vec::new();
        self.parse_expected(SyntaxKind::OpenBraceToken);
        while !self.is_token(SyntaxKind::CloseBraceToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            let before = self.token_pos();
            if let Some(member) = self.parse_class_member() {
                members.push(member);
            }
            if self.token_pos() == before {
                self.error_expected("identifier");
                self.next_token();
            }
        }
        self.parse_expected(SyntaxKind::CloseBraceToken);
        Some(Declaration::Class(ClassDecl {
            name,
            members,
            span: self.span_from(start),
        }))
    }

    /// `public`, `static`, ... unless the word is itself the member name.
    fn is_class_modifier(&mut self) -> bool {
        self.is_token(SyntaxKind::Identifier)
            && matches!(
                self.token_text(),
                "public" | "private" | "protected" | "static" | "override" | "abstract"
            )
            && self.look_ahead(|p| {
                p.next_token();
                !matches!(
                    p.current_token,
                    SyntaxKind::ColonToken
                        | SyntaxKind::QuestionToken
                        | SyntaxKind::OpenParenToken
                        | SyntaxKind::EqualsToken
                        | SyntaxKind::SemicolonToken
                )
            })
    }

    fn parse_class_member(&mut self) -> Option<ClassMember> {
        if self.parse_optional(SyntaxKind::SemicolonToken) {
            return None;
        }
        while self.is_class_modifier() {
            self.next_token();
        }
        let readonly = self.is_token(SyntaxKind::ReadonlyKeyword)
            && self.look_ahead(|p| {
                p.next_token();
                p.is_identifier_or_keyword() || p.is_token(SyntaxKind::StringLiteral)
            });
        if readonly {
            self.next_token();
        }

        if self.is_token(SyntaxKind::Identifier)
            && self.token_text() == "constructor"
            && self.look_ahead(|p| {
                p.next_token();
                p.is_token(SyntaxKind::OpenParenToken)
            })
        {
            self.next_token();
            let params = self.parse_parameter_list();
            self.skip_body_or_semicolon();
            return Some(ClassMember::Constructor(params));
        }

        let name = self.parse_property_name()?;
        let optional = self.parse_optional(SyntaxKind::QuestionToken);

        if self.is_token(SyntaxKind::OpenParenToken) || self.is_token(SyntaxKind::LessThanToken) {
            let start = name.span.start;
            let type_params = self.parse_type_parameters();
            let params = self.parse_parameter_list();
            let return_type = if self.parse_optional(SyntaxKind::ColonToken) {
                self.parse_return_type()
            } else {
                TypeNode::new(TypeNodeKind::Keyword(KeywordType::Any), Span::at(self.last_end()))
            };
            let signature = SignatureNode {
                type_params,
                params,
                return_type,
                is_constructor: false,
                span: self.span_from(start),
            };
            self.skip_body_or_semicolon();
            return Some(ClassMember::Member(MemberNode::Method {
                name,
                optional,
                signature,
            }));
        }

        if self.parse_optional(SyntaxKind::ColonToken) {
            let type_node = self.parse_type();
            if self.parse_optional(SyntaxKind::EqualsToken) {
                self.skip_to_statement_end();
            } else {
                self.parse_semicolon();
            }
            return Some(ClassMember::Member(MemberNode::Property {
                name,
                optional,
                readonly,
                type_node,
            }));
        }

        if self.parse_optional(SyntaxKind::EqualsToken) {
            let literal_start = self.token_pos();
            let literal = self.look_ahead(|p| {
                let literal = p.parse_literal()?;
                let ends_member = p.is_token(SyntaxKind::SemicolonToken)
                    || p.is_token(SyntaxKind::CloseBraceToken)
                    || p.scanner.has_preceding_line_break();
                ends_member.then_some(literal)
            });
            return match literal {
                Some(_) => {
                    let value = self.parse_literal()?;
                    self.parse_semicolon();
                    Some(ClassMember::Initialized {
                        name,
                        readonly,
                        value,
                    })
                }
                None => {
                    // Only literal initializers carry a type without an annotation.
                    self.error_at(
                        literal_start,
                        self.token_end().saturating_sub(literal_start),
                        diagnostic_codes::TYPE_EXPECTED,
                        &[],
                    );
                    self.skip_to_statement_end();
                    None
                }
            };
        }

        self.error_expected(":");
        self.skip_to_statement_end();
        None
    }

    /// `function name<T>(params): ReturnType { body }` or the `declare` form.
    fn parse_function(&mut self, start: u32) -> Option<Declaration> {
        self.next_token();
        let name = self.parse_identifier_name(false);
        let sig_start = self.token_pos();
        let type_params = self.parse_type_parameters();
        let params = self.parse_parameter_list();
        let return_type = if self.parse_optional(SyntaxKind::ColonToken) {
            self.parse_return_type()
        } else {
            TypeNode::new(TypeNodeKind::Keyword(KeywordType::Any), Span::at(self.last_end()))
        };
        let signature = SignatureNode {
            type_params,
            params,
            return_type,
            is_constructor: false,
            span: self.span_from(sig_start),
        };
        self.skip_body_or_semicolon();
        Some(Declaration::Function(FunctionDecl {
            name,
            signature,
            span: self.span_from(start),
        }))
    }

    /// `const name: Type;` or `const name = literal;`
    fn parse_const(&mut self, start: u32) -> Option<Declaration> {
        self.next_token();
        let name = self.parse_identifier_name(false);
        let type_node = if self.parse_optional(SyntaxKind::ColonToken) {
            let type_node = self.parse_type();
            if self.parse_optional(SyntaxKind::EqualsToken) {
                self.skip_to_statement_end();
            } else {
                self.parse_semicolon();
            }
            type_node
        } else if self.parse_optional(SyntaxKind::EqualsToken) {
            let literal_start = self.token_pos();
            let is_literal_statement = self.look_ahead(|p| {
                p.parse_literal().is_some()
                    && (p.is_token(SyntaxKind::SemicolonToken)
                        || p.is_token(SyntaxKind::EndOfFileToken)
                        || p.scanner.has_preceding_line_break())
            });
            if !is_literal_statement {
                // Unannotated non-literal initializers have no declared type.
                self.skip_to_statement_end();
                return None;
            }
            let literal = self.parse_literal()?;
            let type_node =
                TypeNode::new(TypeNodeKind::Literal(literal), self.span_from(literal_start));
            self.parse_semicolon();
            type_node
        } else {
            self.error_expected(":");
            self.skip_to_statement_end();
            return None;
        };
        Some(Declaration::Const(ConstDecl {
            name,
            type_node,
            span: self.span_from(start),
        }))
    }

    fn skip_body_or_semicolon(&mut self) {
        if self.is_token(SyntaxKind::OpenBraceToken) {
            self.skip_block();
        } else {
            self.parse_semicolon();
        }
    }
}
