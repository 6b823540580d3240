//! Declared signatures of the builtins, as announced to the host.

use serde_json::Value;

use crate::error::BuiltinError;

use super::BuiltinName;

/// The argument shapes the host type-checks before calling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgType {
    String,
    StringArray,
    /// Object with the named, optional properties.
    Object(&'static [&'static str]),
    /// Array of objects with the named, optional properties.
    ObjectArray(&'static [&'static str]),
    /// Object with arbitrary string keys; `null` stands for an empty one.
    Dynamic,
    AnyOf(&'static [ArgType]),
}

impl ArgType {
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            ArgType::String => value.is_string(),
            ArgType::StringArray => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
            ArgType::Object(_) => value.is_object(),
            ArgType::ObjectArray(_) => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_object)),
            ArgType::Dynamic => value.is_object() || value.is_null(),
            ArgType::AnyOf(types) => types.iter().any(|t| t.accepts(value)),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            ArgType::String => "string".to_string(),
            ArgType::StringArray => "array[string]".to_string(),
            ArgType::Object(fields) => format!("object{{{}}}", fields.join(", ")),
            ArgType::ObjectArray(fields) => format!("array[object{{{}}}]", fields.join(", ")),
            ArgType::Dynamic => "object[string: any]".to_string(),
            ArgType::AnyOf(types) => types
                .iter()
                .map(ArgType::describe)
                .collect::<Vec<_>>()
                .join(" | "),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgDecl {
    pub name: &'static str,
    pub ty: ArgType,
}

/// Name, positional arguments, result keys and memoization of one builtin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionDecl {
    pub name: BuiltinName,
    pub args: &'static [ArgDecl],
    /// Keys present in a successful result; `error` is always first.
    pub returns: &'static [&'static str],
    /// Pure given identical arguments within one evaluation.
    pub memoize: bool,
}

impl FunctionDecl {
    pub fn arity(&self) -> usize {
        self.args.len()
    }

    /// Check the arguments against the declared schema, reporting 1-based positions.
    pub fn check_args(&self, args: &[Value]) -> Result<(), BuiltinError> {
        if args.len() != self.arity() {
            return Err(BuiltinError::Arity {
                expected: self.arity(),
                actual: args.len(),
            });
        }
        for (pos, (decl, value)) in self.args.iter().zip(args).enumerate() {
            if !decl.ty.accepts(value) {
                return Err(
                    BuiltinError::type_mismatch(decl.name, value, decl.ty.describe()).at(pos + 1),
                );
            }
        }
        Ok(())
    }
}

pub(crate) const SUBJECT: ArgDecl = ArgDecl {
    name: "subject",
    ty: ArgType::Object(&["id", "subjectType", "property", "type"]),
};

pub(crate) const RESOURCES: ArgDecl = ArgDecl {
    name: "resources",
    ty: ArgType::ObjectArray(&["externalId", "type", "actions"]),
};

pub(crate) const RESOURCE_REFERENCES: ArgDecl = ArgDecl {
    name: "resources",
    ty: ArgType::ObjectArray(&["id", "label"]),
};

pub(crate) const RESOURCE_TYPES: ArgDecl = ArgDecl {
    name: "resource_types",
    ty: ArgType::ObjectArray(&["type", "actions"]),
};

pub(crate) const DIGITAL_TWIN_IDENTIFIER: ArgDecl = ArgDecl {
    name: "digital_twin_identifier",
    ty: ArgType::AnyOf(&[
        ArgType::String,
        ArgType::Object(&["digital_twin_id", "tenant_id"]),
        ArgType::Object(&["property_type", "property_value"]),
    ]),
};

pub(crate) const OPTIONS: ArgDecl = ArgDecl {
    name: "options",
    ty: ArgType::Dynamic,
};

pub(crate) const INPUT_PARAMS: ArgDecl = ArgDecl {
    name: "inputParams",
    ty: ArgType::Dynamic,
};

pub(crate) const POLICY_TAGS: ArgDecl = ArgDecl {
    name: "policyTags",
    ty: ArgType::StringArray,
};

pub(crate) const ACTIONS: ArgDecl = ArgDecl {
    name: "actions",
    ty: ArgType::StringArray,
};

pub(crate) const TOKEN: ArgDecl = ArgDecl {
    name: "token",
    ty: ArgType::String,
};

pub(crate) const PROPERTIES: ArgDecl = ArgDecl {
    name: "properties",
    ty: ArgType::StringArray,
};

pub(crate) const IDENTITY_RETURNS: &[&str] = &[
    "error",
    "active",
    "expire",
    "customerId",
    "appSpaceId",
    "applicationId",
    "subjectId",
    "tenantId",
    "impersonatedId",
    "tokenClaims",
    "sessionClaims",
];
