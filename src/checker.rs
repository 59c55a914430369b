//! Interface Contract Checker
//!
//! Verifies that every object declaring an interface defines all of the
//! interface's fields with compatible types. Read-only: the checker never
//! touches the registry it borrows.
//!
//! Compatibility is GraphQL field covariance:
//! - same named type, or an object type that declares the expected
//!   interface or structurally provides all of its fields;
//! - a non-null type may stand in for a nullable one, never the reverse;
//! - lists match lists, with items compared by the same rules.

use std::collections::HashSet;

use tracing::warn;

use crate::declaration::{FieldType, TypeKind};
use crate::diagnostics::Diagnostics;
use crate::error::{Result, SchemaError};
use crate::registry::{InterfaceConformance, TypeRegistry};

pub struct InterfaceChecker<'a> {
    registry: &'a TypeRegistry,
}

impl<'a> InterfaceChecker<'a> {
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self { registry }
    }

    /// Check one conformance relation
    pub fn check(&self, conformance: &InterfaceConformance) -> Result<()> {
        let object = self.registry.lookup(&conformance.object)?;
        let interface = match self.registry.get(&conformance.interface) {
            Some(decl) if decl.kind() == TypeKind::Interface => decl,
            found => {
                return Err(SchemaError::MissingInterface {
                    object: conformance.object.clone(),
                    interface: conformance.interface.clone(),
                    found: found.map(|d| d.kind()),
                })
            }
        };

        for expected in interface.fields() {
            let incompatible = |actual: String| SchemaError::IncompatibleField {
                type_name: object.name().to_string(),
                interface: interface.name().to_string(),
                field: expected.name.clone(),
                expected: expected.ty.to_string(),
                actual,
            };

            let actual = object
                .field(&expected.name)
                .ok_or_else(|| incompatible("<missing>".to_string()))?;

            if !self.is_compatible(&expected.ty, &actual.ty) {
                return Err(incompatible(actual.ty.to_string()));
            }
        }

        Ok(())
    }

    /// Check every recorded conformance, in declaration order.
    ///
    /// Returns conflicts between interfaces as diagnostics; they are reported,
    /// not resolved, since no interface takes precedence over another.
    pub fn check_all(&self) -> Result<Diagnostics> {
        for conformance in self.registry.conformances() {
            self.check(conformance)?;
        }
        Ok(self.interface_conflicts())
    }

    /// Whether a field of type `actual` satisfies an interface field of type
    /// `expected`
    pub fn is_compatible(&self, expected: &FieldType, actual: &FieldType) -> bool {
        self.is_compatible_within(expected, actual, &mut HashSet::new())
    }

    fn is_compatible_within(
        &self,
        expected: &FieldType,
        actual: &FieldType,
        in_progress: &mut HashSet<(String, String)>,
    ) -> bool {
        if !expected.is_nullable() && actual.is_nullable() {
            return false;
        }
        if expected.is_list() != actual.is_list() {
            return false;
        }
        if expected.is_list() && !expected.is_item_nullable() && actual.is_item_nullable() {
            return false;
        }
        self.is_named_compatible(expected.name(), actual.name(), in_progress)
    }

    fn is_named_compatible(
        &self,
        expected: &str,
        actual: &str,
        in_progress: &mut HashSet<(String, String)>,
    ) -> bool {
        if expected == actual {
            return true;
        }
        let Some(interface) = self
            .registry
            .get(expected)
            .filter(|decl| decl.kind() == TypeKind::Interface)
        else {
            return false;
        };
        let Some(object) = self
            .registry
            .get(actual)
            .filter(|decl| decl.kind() == TypeKind::Object)
        else {
            return false;
        };
        if object.interfaces().iter().any(|i| i == expected) {
            return true;
        }

        // Structural equivalence. A pair already being compared is assumed
        // to hold, so self-referencing types terminate.
        let pair = (expected.to_string(), actual.to_string());
        if !in_progress.insert(pair.clone()) {
            return true;
        }
        let satisfied = interface.fields().iter().all(|wanted| {
            object.field(&wanted.name).is_some_and(|found| {
                self.is_compatible_within(&wanted.ty, &found.ty, in_progress)
            })
        });
        in_progress.remove(&pair);
        satisfied
    }

    /// Same-named fields with different types across interfaces of one object
    fn interface_conflicts(&self) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();

        for object in self.registry.iter() {
            let interfaces: Vec<_> = object
                .interfaces()
                .iter()
                .filter_map(|name| self.registry.get(name))
                .collect();

            for (i, first) in interfaces.iter().enumerate() {
                for second in &interfaces[i + 1..] {
                    for field in first.fields() {
                        let Some(other) = second.field(&field.name) else {
                            continue;
                        };
                        if other.ty != field.ty {
                            warn!(
                                object = %object.name(),
                                field = %field.name,
                                first = %first.name(),
                                second = %second.name(),
                                "interfaces disagree on field type"
                            );
                            diagnostics.interface_field_conflict(
                                object.name(),
                                &field.name,
                                (first.name(), &field.ty.to_string()),
                                (second.name(), &other.ty.to_string()),
                            );
                        }
                    }
                }
            }
        }

        diagnostics
    }
}
