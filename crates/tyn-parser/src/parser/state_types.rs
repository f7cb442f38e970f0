//! Parser state - type annotations, signatures and predicates

use super::state::ParserState;
use crate::ast::*;
use tyn_common::Span;
use tyn_common::diagnostics::diagnostic_codes;
use tyn_common::limits::MAX_PARSER_RECURSION_DEPTH;
use tyn_scanner::SyntaxKind;

impl ParserState {
    /// Parse a type that must span the whole input.
    pub(crate) fn parse_standalone_type(&mut self) -> TypeNode {
        let type_node = self.parse_type();
        if !self.is_token(SyntaxKind::EndOfFileToken) {
            self.error_expected(";");
        }
        type_node
    }

    /// Parse a type (unions, intersections, postfix arrays, primaries).
    pub(crate) fn parse_type(&mut self) -> TypeNode {
        if !self.can_token_start_type() {
            self.error_type_expected();
            return self.error_node();
        }
        if self.recursion_depth >= MAX_PARSER_RECURSION_DEPTH {
            return self.skip_nested_type();
        }
        self.recursion_depth += 1;
        let type_node = self.parse_union_type();
        self.recursion_depth -= 1;
        type_node
    }

    pub(crate) fn error_node(&mut self) -> TypeNode {
        TypeNode::new(TypeNodeKind::Error, Span::at(self.token_pos()))
    }

    /// Report a type nested past `MAX_PARSER_RECURSION_DEPTH` and skip the
    /// rest of it, up to the first closing bracket it did not open.
    fn skip_nested_type(&mut self) -> TypeNode {
        let start = self.token_pos();
        self.error_at_current(diagnostic_codes::TYPE_NESTED_TOO_DEEPLY, &[]);
        let mut depth = 0u32;
        loop {
            match self.current_token {
                SyntaxKind::EndOfFileToken => break,
                SyntaxKind::SemicolonToken if depth == 0 => break,
                SyntaxKind::OpenParenToken
                | SyntaxKind::OpenBracketToken
                | SyntaxKind::OpenBraceToken
                | SyntaxKind::LessThanToken => depth += 1,
                SyntaxKind::CloseParenToken
                | SyntaxKind::CloseBracketToken
                | SyntaxKind::CloseBraceToken
                | SyntaxKind::GreaterThanToken => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                }
                _ => {}
            }
            self.next_token();
        }
        TypeNode::new(TypeNodeKind::Error, self.span_from(start))
    }

    fn can_token_start_type(&self) -> bool {
        matches!(
            self.current_token,
            SyntaxKind::Identifier
                | SyntaxKind::StringLiteral
                | SyntaxKind::NumericLiteral
                | SyntaxKind::BigIntLiteral
                | SyntaxKind::MinusToken
                | SyntaxKind::OpenBraceToken
                | SyntaxKind::OpenParenToken
                | SyntaxKind::OpenBracketToken
                | SyntaxKind::LessThanToken
                | SyntaxKind::BarToken
                | SyntaxKind::AmpersandToken
                | SyntaxKind::NewKeyword
                | SyntaxKind::TypeOfKeyword
                | SyntaxKind::ReadonlyKeyword
                | SyntaxKind::ThisKeyword
                | SyntaxKind::NullKeyword
                | SyntaxKind::UndefinedKeyword
                | SyntaxKind::TrueKeyword
                | SyntaxKind::FalseKeyword
                | SyntaxKind::StringKeyword
                | SyntaxKind::NumberKeyword
                | SyntaxKind::BooleanKeyword
                | SyntaxKind::BigIntKeyword
                | SyntaxKind::SymbolKeyword
                | SyntaxKind::ObjectKeyword
                | SyntaxKind::AnyKeyword
                | SyntaxKind::UnknownKeyword
                | SyntaxKind::NeverKeyword
                | SyntaxKind::VoidKeyword
        )
    }

    fn parse_union_type(&mut self) -> TypeNode {
        let start = self.token_pos();
        let leading_bar = self.parse_optional(SyntaxKind::BarToken);
        let first = self.parse_intersection_type();
        if !self.is_token(SyntaxKind::BarToken) {
            if leading_bar {
                return TypeNode::new(TypeNodeKind::Union(vec![first]), self.span_from(start));
            }
            return first;
        }
        let mut members = vec![first];
        while self.parse_optional(SyntaxKind::BarToken) {
            members.push(self.parse_intersection_type());
        }
        TypeNode::new(TypeNodeKind::Union(members), self.span_from(start))
    }

    fn parse_intersection_type(&mut self) -> TypeNode {
        let start = self.token_pos();
        self.parse_optional(SyntaxKind::AmpersandToken);
        let first = self.parse_type_operator();
        if !self.is_token(SyntaxKind::AmpersandToken) {
            return first;
        }
        let mut members = vec![first];
        while self.parse_optional(SyntaxKind::AmpersandToken) {
            members.push(self.parse_type_operator());
        }
        TypeNode::new(TypeNodeKind::Intersection(members), self.span_from(start))
    }

    fn parse_type_operator(&mut self) -> TypeNode {
        if self.is_token(SyntaxKind::ReadonlyKeyword) {
            if self.recursion_depth >= MAX_PARSER_RECURSION_DEPTH {
                return self.skip_nested_type();
            }
            let start = self.token_pos();
            self.next_token();
            self.recursion_depth += 1;
            let operand = self.parse_type_operator();
            self.recursion_depth -= 1;
            return TypeNode::new(
                TypeNodeKind::ReadonlyOperator(Box::new(operand)),
                self.span_from(start),
            );
        }
        self.parse_postfix_type()
    }

    /// `T[]`, `T["prop"]`
    fn parse_postfix_type(&mut self) -> TypeNode {
        let start = self.token_pos();
        let mut type_node = self.parse_primary_type();
        let mut wraps = 0u32;
        while self.is_token(SyntaxKind::OpenBracketToken) && !self.scanner.has_preceding_line_break()
        {
            if self.recursion_depth + wraps >= MAX_PARSER_RECURSION_DEPTH {
                self.skip_nested_type();
                return TypeNode::new(TypeNodeKind::Error, self.span_from(start));
            }
            wraps += 1;
            self.next_token();
            if self.parse_optional(SyntaxKind::CloseBracketToken) {
                type_node =
                    TypeNode::new(TypeNodeKind::Array(Box::new(type_node)), self.span_from(start));
            } else {
                let index = self.parse_type();
                self.parse_expected(SyntaxKind::CloseBracketToken);
                type_node = TypeNode::new(
                    TypeNodeKind::IndexedAccess {
                        object: Box::new(type_node),
                        index: Box::new(index),
                    },
                    self.span_from(start),
                );
            }
        }
        type_node
    }

    fn parse_primary_type(&mut self) -> TypeNode {
        let start = self.token_pos();
        let keyword = match self.current_token {
            SyntaxKind::StringKeyword => Some(KeywordType::String),
            SyntaxKind::NumberKeyword => Some(KeywordType::Number),
            SyntaxKind::BooleanKeyword => Some(KeywordType::Boolean),
            SyntaxKind::BigIntKeyword => Some(KeywordType::BigInt),
            SyntaxKind::SymbolKeyword => Some(KeywordType::Symbol),
            SyntaxKind::ObjectKeyword => Some(KeywordType::Object),
            SyntaxKind::AnyKeyword => Some(KeywordType::Any),
            SyntaxKind::UnknownKeyword => Some(KeywordType::Unknown),
            SyntaxKind::NeverKeyword => Some(KeywordType::Never),
            SyntaxKind::VoidKeyword => Some(KeywordType::Void),
            SyntaxKind::NullKeyword => Some(KeywordType::Null),
            SyntaxKind::UndefinedKeyword => Some(KeywordType::Undefined),
            SyntaxKind::ThisKeyword => Some(KeywordType::This),
            _ => None,
        };
        if let Some(keyword) = keyword {
            self.next_token();
            return TypeNode::new(TypeNodeKind::Keyword(keyword), self.span_from(start));
        }

        match self.current_token {
            SyntaxKind::StringLiteral
            | SyntaxKind::NumericLiteral
            | SyntaxKind::BigIntLiteral
            | SyntaxKind::MinusToken
            | SyntaxKind::TrueKeyword
            | SyntaxKind::FalseKeyword => match self.parse_literal() {
                Some(literal) => {
                    TypeNode::new(TypeNodeKind::Literal(literal), self.span_from(start))
                }
                None => {
                    self.error_type_expected();
                    self.error_node()
                }
            },
            SyntaxKind::TypeOfKeyword => {
                self.next_token();
                let name = self.parse_identifier_name(false);
                TypeNode::new(TypeNodeKind::TypeQuery(name), self.span_from(start))
            }
            SyntaxKind::NewKeyword => {
                self.next_token();
                let mut signature = self.parse_function_type_signature(start);
                signature.is_constructor = true;
                TypeNode::new(
                    TypeNodeKind::Function(Box::new(signature)),
                    self.span_from(start),
                )
            }
            SyntaxKind::LessThanToken => {
                let signature = self.parse_function_type_signature(start);
                TypeNode::new(
                    TypeNodeKind::Function(Box::new(signature)),
                    self.span_from(start),
                )
            }
            SyntaxKind::OpenParenToken => {
                if self.is_start_of_function_type() {
                    let signature = self.parse_function_type_signature(start);
                    return TypeNode::new(
                        TypeNodeKind::Function(Box::new(signature)),
                        self.span_from(start),
                    );
                }
                self.next_token();
                let inner = self.parse_type();
                self.parse_expected(SyntaxKind::CloseParenToken);
                TypeNode::new(
                    TypeNodeKind::Parenthesized(Box::new(inner)),
                    self.span_from(start),
                )
            }
            SyntaxKind::OpenBraceToken => {
                let members = self.parse_object_type_members();
                TypeNode::new(TypeNodeKind::Object(members), self.span_from(start))
            }
            SyntaxKind::OpenBracketToken => self.parse_tuple_type(),
            SyntaxKind::Identifier => {
                let name = self.parse_identifier_name(false);
                let type_args = if self.is_token(SyntaxKind::LessThanToken) {
                    self.parse_type_arguments()
                } else {
                    Vec::new()
                };
                TypeNode::new(
                    TypeNodeKind::Reference { name, type_args },
                    self.span_from(start),
                )
            }
            _ => {
                self.error_type_expected();
                let node = self.error_node();
                if !self.is_token(SyntaxKind::EndOfFileToken) {
                    self.next_token();
                }
                node
            }
        }
    }

    /// String, numeric, bigint (optionally negated) and boolean literals.
    pub(crate) fn parse_literal(&mut self) -> Option<LiteralNode> {
        let negative = self.parse_optional(SyntaxKind::MinusToken);
        let literal = match self.current_token {
            SyntaxKind::StringLiteral if !negative => {
                LiteralNode::String(self.token_text().to_string())
            }
            SyntaxKind::NumericLiteral => {
                let text = self.token_text().replace('_', "");
                let value: f64 = text.parse().ok()?;
                LiteralNode::Number(if negative { -value } else { value })
            }
            SyntaxKind::BigIntLiteral => {
                let digits = self.token_text().replace('_', "");
                LiteralNode::BigInt(if negative {
                    format!("-{digits}")
                } else {
                    digits
                })
            }
            SyntaxKind::TrueKeyword if !negative => LiteralNode::Boolean(true),
            SyntaxKind::FalseKeyword if !negative => LiteralNode::Boolean(false),
            _ => return None,
        };
        self.next_token();
        Some(literal)
    }

    fn parse_type_arguments(&mut self) -> Vec<TypeNode> {
        self.parse_expected(SyntaxKind::LessThanToken);
        let mut args = Vec::new();
        while !self.is_token(SyntaxKind::GreaterThanToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            args.push(self.parse_type());
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::GreaterThanToken);
        args
    }

    pub(crate) fn parse_type_parameters(&mut self) -> Vec<TypeParamNode> {
        if !self.parse_optional(SyntaxKind::LessThanToken) {
            return Vec::new();
        }
        let mut params = Vec::new();
        while !self.is_token(SyntaxKind::GreaterThanToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            let name = self.parse_identifier_name(false);
            let constraint = if self.parse_optional(SyntaxKind::ExtendsKeyword) {
                Some(self.parse_type())
            } else {
                None
            };
            params.push(TypeParamNode { name, constraint });
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::GreaterThanToken);
        params
    }

    /// `(` followed by `)`, `...`, `this`, or `name` then `:`/`?`/`,`/`)` `=>`.
    fn is_start_of_function_type(&mut self) -> bool {
        self.look_ahead(|p| {
            p.next_token();
            if p.is_token(SyntaxKind::CloseParenToken) || p.is_token(SyntaxKind::DotDotDotToken) {
                return true;
            }
            if !p.is_identifier_or_keyword() {
                return false;
            }
            p.next_token();
            match p.current_token {
                SyntaxKind::ColonToken | SyntaxKind::QuestionToken | SyntaxKind::CommaToken => {
                    true
                }
                SyntaxKind::CloseParenToken => {
                    p.next_token();
                    p.is_token(SyntaxKind::EqualsGreaterThanToken)
                }
                _ => false,
            }
        })
    }

    /// `<T>(params) => ReturnType`
    fn parse_function_type_signature(&mut self, start: u32) -> SignatureNode {
        let type_params = self.parse_type_parameters();
        let params = self.parse_parameter_list();
        self.parse_expected(SyntaxKind::EqualsGreaterThanToken);
        let return_type = self.parse_return_type();
        SignatureNode {
            type_params,
            params,
            return_type,
            is_constructor: false,
            span: self.span_from(start),
        }
    }

    /// `(a: T, b?: U, ...rest: V[])`
    pub(crate) fn parse_parameter_list(&mut self) -> Vec<ParamNode> {
        let mut params = Vec::new();
        if !self.parse_expected(SyntaxKind::OpenParenToken) {
            return params;
        }
        while !self.is_token(SyntaxKind::CloseParenToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            // Parameter property modifiers (`public x: T`) do not change the type.
            while self.is_parameter_modifier() {
                self.next_token();
            }
            let rest = self.parse_optional(SyntaxKind::DotDotDotToken);
            let name = self.parse_identifier_name(true);
            let optional = self.parse_optional(SyntaxKind::QuestionToken);
            let type_node = if self.parse_optional(SyntaxKind::ColonToken) {
                Some(self.parse_type())
            } else {
                None
            };
            if self.is_token(SyntaxKind::EqualsToken) {
                // Default values make the parameter optional; the value is skipped.
                self.next_token();
                while !matches!(
                    self.current_token,
                    SyntaxKind::CommaToken | SyntaxKind::CloseParenToken | SyntaxKind::EndOfFileToken
                ) {
                    self.next_token();
                }
                params.push(ParamNode {
                    name,
                    type_node,
                    optional: true,
                    rest,
                });
            } else {
                params.push(ParamNode {
                    name,
                    type_node,
                    optional,
                    rest,
                });
            }
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseParenToken);
        params
    }

    fn is_parameter_modifier(&mut self) -> bool {
        let is_modifier = self.is_token(SyntaxKind::ReadonlyKeyword)
            || (self.is_token(SyntaxKind::Identifier)
                && matches!(self.token_text(), "public" | "private" | "protected"));
        is_modifier
            && self.look_ahead(|p| {
                p.next_token();
                p.is_identifier_or_keyword()
            })
    }

    /// A return type, which may be a type predicate.
    pub(crate) fn parse_return_type(&mut self) -> TypeNode {
        let start = self.token_pos();
        if self.is_asserts_type_predicate_start() {
            self.next_token();
            let parameter = self.parse_identifier_name(true);
            let type_node = if self.parse_optional(SyntaxKind::IsKeyword) {
                Some(Box::new(self.parse_type()))
            } else {
                None
            };
            return TypeNode::new(
                TypeNodeKind::Predicate {
                    asserts: true,
                    parameter,
                    type_node,
                },
                self.span_from(start),
            );
        }

        if self.is_token(SyntaxKind::Identifier) || self.is_token(SyntaxKind::ThisKeyword) {
            let is_predicate = self.look_ahead(|p| {
                p.next_token();
                p.is_token(SyntaxKind::IsKeyword) && !p.scanner.has_preceding_line_break()
            });
            if is_predicate {
                let parameter = self.parse_identifier_name(true);
                self.next_token(); // consume 'is'
                let type_node = self.parse_type();
                return TypeNode::new(
                    TypeNodeKind::Predicate {
                        asserts: false,
                        parameter,
                        type_node: Some(Box::new(type_node)),
                    },
                    self.span_from(start),
                );
            }
        }

        self.parse_type()
    }

    fn is_asserts_type_predicate_start(&mut self) -> bool {
        if !self.is_token(SyntaxKind::AssertsKeyword) {
            return false;
        }
        self.look_ahead(|p| {
            p.next_token();
            (p.is_token(SyntaxKind::Identifier) || p.is_token(SyntaxKind::ThisKeyword))
                && !p.scanner.has_preceding_line_break()
        })
    }

    /// `{ a: T; readonly b?: U; m(x: V): W }`
    pub(crate) fn parse_object_type_members(&mut self) -> Vec<MemberNode> {
        let mut members = Vec::new();
        self.parse_expected(SyntaxKind::OpenBraceToken);
        while !self.is_token(SyntaxKind::CloseBraceToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            let before = self.token_pos();
            if let Some(member) = self.parse_type_member() {
                members.push(member);
            }
            if !self.parse_optional(SyntaxKind::SemicolonToken) {
                self.parse_optional(SyntaxKind::CommaToken);
            }
            if self.token_pos() == before {
                // No progress; drop the offending token.
                self.next_token();
            }
        }
        self.parse_expected(SyntaxKind::CloseBraceToken);
        members
    }

    /// A single property or method signature.
    pub(crate) fn parse_type_member(&mut self) -> Option<MemberNode> {
        let readonly = self.is_token(SyntaxKind::ReadonlyKeyword)
            && self.look_ahead(|p| {
                p.next_token();
                p.is_identifier_or_keyword() || p.is_token(SyntaxKind::StringLiteral)
            });
        if readonly {
            self.next_token();
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
            return Some(MemberNode::Method {
                name,
                optional,
                signature: SignatureNode {
                    type_params,
                    params,
                    return_type,
                    is_constructor: false,
                    span: self.span_from(start),
                },
            });
        }

        let type_node = if self.parse_optional(SyntaxKind::ColonToken) {
            self.parse_type()
        } else {
            self.error_expected(":");
            self.error_node()
        };
        Some(MemberNode::Property {
            name,
            optional,
            readonly,
            type_node,
        })
    }

    /// Identifier, keyword or string-literal property name.
    pub(crate) fn parse_property_name(&mut self) -> Option<Ident> {
        if self.is_token(SyntaxKind::StringLiteral) {
            let ident = Ident::new(
                self.token_text(),
                Span::new(self.token_pos(), self.token_end()),
            );
            self.next_token();
            return Some(ident);
        }
        if self.is_identifier_or_keyword() {
            return Some(self.parse_identifier_name(true));
        }
        self.error_expected("identifier");
        None
    }

    /// `[name: T, b?: U, ...rest: V[]]` or `[T, U]`
    fn parse_tuple_type(&mut self) -> TypeNode {
        let start = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBracketToken);
        let mut elements = Vec::new();
        while !self.is_token(SyntaxKind::CloseBracketToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            let rest = self.parse_optional(SyntaxKind::DotDotDotToken);
            let is_named = self.is_identifier_or_keyword()
                && self.look_ahead(|p| {
                    p.next_token();
                    if p.is_token(SyntaxKind::QuestionToken) {
                        p.next_token();
                    }
                    p.is_token(SyntaxKind::ColonToken)
                });
            let (name, named_optional) = if is_named {
                let name = self.parse_identifier_name(true);
                let optional = self.parse_optional(SyntaxKind::QuestionToken);
                self.parse_expected(SyntaxKind::ColonToken);
                (Some(name), optional)
            } else {
                (None, false)
            };
            let type_node = self.parse_type();
            let optional = named_optional || self.parse_optional(SyntaxKind::QuestionToken);
            elements.push(TupleElementNode {
                name,
                type_node,
                optional,
                rest,
            });
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseBracketToken);
        TypeNode::new(TypeNodeKind::Tuple(elements), self.span_from(start))
    }
}
