use super::{DiagnosticCategory, DiagnosticMessage};

pub mod diagnostic_messages {
    pub const EXPECTED: &str = "'{0}' expected.";
    pub const TYPE_EXPECTED: &str = "Type expected.";
    pub const DECLARATION_EXPECTED: &str = "Declaration or statement expected.";
    pub const UNTERMINATED_STRING_LITERAL: &str = "Unterminated string literal.";
    pub const INVALID_CHARACTER: &str = "Invalid character.";
    pub const TYPE_NESTED_TOO_DEEPLY: &str = "Type is nested too deeply.";
    pub const TYPE_DOES_NOT_SATISFY_EXPECTED: &str =
        "Type '{0}' does not satisfy the expected type '{1}'.";
    pub const READONLY_ONLY_ON_ARRAYS: &str =
        "'readonly' type modifier is only permitted on array and tuple literal types.";
    pub const DUPLICATE_IDENTIFIER: &str = "Duplicate identifier '{0}'.";
    pub const CANNOT_FIND_NAME: &str = "Cannot find name '{0}'.";
    pub const GENERIC_TYPE_REQUIRES_ARGUMENTS: &str =
        "Generic type '{0}' requires {1} type argument(s).";
    pub const TYPE_NOT_GENERIC: &str = "Type '{0}' is not generic.";
    pub const TYPE_NOT_ASSIGNABLE: &str = "Type '{0}' is not assignable to type '{1}'.";
    pub const PROPERTY_DOES_NOT_EXIST: &str = "Property '{0}' does not exist on type '{1}'.";
    pub const TYPE_DOES_NOT_SATISFY_CONSTRAINT: &str =
        "Type '{0}' does not satisfy the constraint '{1}'.";
    pub const ARGUMENT_NOT_ASSIGNABLE: &str =
        "Argument of type '{0}' is not assignable to parameter of type '{1}'.";
    pub const CONVERSION_MAY_BE_A_MISTAKE: &str = "Conversion of type '{0}' to type '{1}' may be a mistake because neither type sufficiently overlaps with the other. If this was intentional, convert the expression to 'unknown' first.";
    pub const TYPE_ALIAS_CIRCULAR: &str = "Type alias '{0}' circularly references itself.";
    pub const REFERENCED_IN_OWN_ANNOTATION: &str =
        "'{0}' is referenced directly or indirectly in its own type annotation.";
    pub const THIS_TYPE_UNAVAILABLE: &str =
        "A 'this' type is available only in a non-static member of a class or interface.";
    pub const INVALID_INDEX_TYPE: &str = "Type '{0}' cannot be used as an index type.";
    pub const NOT_COMPARABLE: &str = "Type '{0}' is not comparable to type '{1}'.";
    pub const THIS_CONTEXT_NOT_ASSIGNABLE: &str =
        "The 'this' context of type '{0}' is not assignable to method's 'this' of type '{1}'.";
    pub const PROPERTY_MISSING: &str =
        "Property '{0}' is missing in type '{1}' but required in type '{2}'.";
    pub const EMPTY_UNION_DECLARATION: &str =
        "Union type declaration must have at least one member.";
    pub const DUPLICATE_UNION_MEMBER: &str = "Duplicate member '{0}' in union type declaration.";
    pub const NESTED_UNION_MEMBER: &str =
        "Union '{0}' must be flattened before it can be a member of a declared union.";
    pub const AMBIGUOUS_DISCRIMINANT: &str =
        "Discriminant property '{0}' has the value {1} in more than one variant.";
    pub const MISSING_DISCRIMINANT: &str =
        "Variant '{0}' has no literal discriminant property '{1}'.";
    pub const ASSERTION_UNVERIFIABLE: &str = "Assertion that '{0}' is '{1}' is unverified; the runtime check is trusted as declared.";
    pub const UNSUPPORTED_INTERSECTION: &str =
        "Intersection of '{0}' and '{1}' is not supported.";
}

pub mod diagnostic_codes {
    pub const EXPECTED: u32 = 1005;
    pub const TYPE_EXPECTED: u32 = 1110;
    pub const DECLARATION_EXPECTED: u32 = 1128;
    pub const UNTERMINATED_STRING_LITERAL: u32 = 1002;
    pub const INVALID_CHARACTER: u32 = 1127;
    pub const TYPE_NESTED_TOO_DEEPLY: u32 = 90008;
    pub const TYPE_DOES_NOT_SATISFY_EXPECTED: u32 = 1360;
    pub const READONLY_ONLY_ON_ARRAYS: u32 = 1354;
    pub const DUPLICATE_IDENTIFIER: u32 = 2300;
    pub const CANNOT_FIND_NAME: u32 = 2304;
    pub const GENERIC_TYPE_REQUIRES_ARGUMENTS: u32 = 2314;
    pub const TYPE_NOT_GENERIC: u32 = 2315;
    pub const TYPE_NOT_ASSIGNABLE: u32 = 2322;
    pub const PROPERTY_DOES_NOT_EXIST: u32 = 2339;
    pub const TYPE_DOES_NOT_SATISFY_CONSTRAINT: u32 = 2344;
    pub const ARGUMENT_NOT_ASSIGNABLE: u32 = 2345;
    pub const CONVERSION_MAY_BE_A_MISTAKE: u32 = 2352;
    pub const TYPE_ALIAS_CIRCULAR: u32 = 2456;
    pub const REFERENCED_IN_OWN_ANNOTATION: u32 = 2502;
    pub const THIS_TYPE_UNAVAILABLE: u32 = 2526;
    pub const INVALID_INDEX_TYPE: u32 = 2538;
    pub const NOT_COMPARABLE: u32 = 2678;
    pub const THIS_CONTEXT_NOT_ASSIGNABLE: u32 = 2684;
    pub const PROPERTY_MISSING: u32 = 2741;
    pub const EMPTY_UNION_DECLARATION: u32 = 90001;
    pub const DUPLICATE_UNION_MEMBER: u32 = 90002;
    pub const NESTED_UNION_MEMBER: u32 = 90003;
    pub const AMBIGUOUS_DISCRIMINANT: u32 = 90004;
    pub const MISSING_DISCRIMINANT: u32 = 90005;
    pub const ASSERTION_UNVERIFIABLE: u32 = 90006;
    pub const UNSUPPORTED_INTERSECTION: u32 = 90007;
}

macro_rules! message {
    ($name:ident, $category:ident) => {
        DiagnosticMessage {
            code: diagnostic_codes::$name,
            category: DiagnosticCategory::$category,
            message: diagnostic_messages::$name,
        }
    };
}

pub static DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    message!(EXPECTED, Error),
    message!(TYPE_EXPECTED, Error),
    message!(DECLARATION_EXPECTED, Error),
    message!(UNTERMINATED_STRING_LITERAL, Error),
    message!(INVALID_CHARACTER, Error),
    message!(TYPE_NESTED_TOO_DEEPLY, Error),
    message!(TYPE_DOES_NOT_SATISFY_EXPECTED, Error),
    message!(READONLY_ONLY_ON_ARRAYS, Error),
    message!(DUPLICATE_IDENTIFIER, Error),
    message!(CANNOT_FIND_NAME, Error),
    message!(GENERIC_TYPE_REQUIRES_ARGUMENTS, Error),
    message!(TYPE_NOT_GENERIC, Error),
    message!(TYPE_NOT_ASSIGNABLE, Error),
    message!(PROPERTY_DOES_NOT_EXIST, Error),
    message!(TYPE_DOES_NOT_SATISFY_CONSTRAINT, Error),
    message!(ARGUMENT_NOT_ASSIGNABLE, Error),
    message!(CONVERSION_MAY_BE_A_MISTAKE, Error),
    message!(TYPE_ALIAS_CIRCULAR, Error),
    message!(REFERENCED_IN_OWN_ANNOTATION, Error),
    message!(THIS_TYPE_UNAVAILABLE, Error),
    message!(INVALID_INDEX_TYPE, Error),
    message!(NOT_COMPARABLE, Error),
    message!(THIS_CONTEXT_NOT_ASSIGNABLE, Error),
    message!(PROPERTY_MISSING, Error),
    message!(EMPTY_UNION_DECLARATION, Error),
    message!(DUPLICATE_UNION_MEMBER, Error),
    message!(NESTED_UNION_MEMBER, Error),
    message!(AMBIGUOUS_DISCRIMINANT, Error),
    message!(MISSING_DISCRIMINANT, Error),
    message!(ASSERTION_UNVERIFIABLE, Warning),
    message!(UNSUPPORTED_INTERSECTION, Error),
];
