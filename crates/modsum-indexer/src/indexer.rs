//! Summary construction from front-end facts
//!
//! Runs in two stages. Each function's facts become one [`FunctionSummary`]
//! independently of every other function. The module's dispatch tables and
//! key-path properties are then walked to register slot implementations and
//! to preserve functions that external code can reach without a visible
//! call edge.

use crate::facts::{
    DeclContextKind, Fact, FunctionFacts, ModuleFacts, PropertyFacts, ReflectionComponent,
    VTableEntryKind, VTableFacts, WitnessTableFacts,
};
use crate::IndexError;
use modsum_core::{guid_of, Call, CallKind, FunctionSummary, Guid, ModuleSummaryIndex, VirtualSlot};
use tracing::debug;

/// Builds the summary of a single function
pub struct FunctionSummaryIndexer<'a> {
    facts: &'a FunctionFacts,
    summary: FunctionSummary,
}

impl<'a> FunctionSummaryIndexer<'a> {
    pub fn new(facts: &'a FunctionFacts) -> Self {
        Self {
            facts,
            summary: FunctionSummary::with_name(guid_of(&facts.name), facts.name.clone()),
        }
    }

    /// Classify every fact of the function body and return the summary
    pub fn index(mut self) -> Result<FunctionSummary, IndexError> {
        for fact in &self.facts.facts {
            self.index_fact(fact)?;
        }
        if self.facts.is_externally_callable() {
            self.summary.mark_preserved();
        }
        Ok(self.summary)
    }

    fn index_fact(&mut self, fact: &Fact) -> Result<(), IndexError> {
        match fact {
            Fact::DirectCall { callee } => self.index_direct_call(callee),
            Fact::WitnessCall { requirement } => {
                self.index_indirect_call(requirement, CallKind::Witness)
            }
            Fact::VTableCall { method } => self.index_indirect_call(method, CallKind::VTable),
            Fact::TypeRef { type_name } => self.summary.add_type_ref(guid_of(type_name)),
            Fact::ReflectionRef { components } => {
                for component in components {
                    self.index_reflection_component(component)?;
                }
            }
        }
        Ok(())
    }

    fn index_direct_call(&mut self, callee: &str) {
        self.summary.add_call(Call::direct(guid_of(callee), callee));
    }

    fn index_indirect_call(&mut self, slot_name: &str, kind: CallKind) {
        self.summary
            .add_call(Call::new(kind, guid_of(slot_name), slot_name));
    }

    fn index_reflection_component(
        &mut self,
        component: &ReflectionComponent,
    ) -> Result<(), IndexError> {
        match component {
            ReflectionComponent::Function { name } => self.index_direct_call(name),
            ReflectionComponent::Method { name, context } => {
                let kind = dispatch_kind(name, *context, &self.facts.name)?;
                self.index_indirect_call(name, kind);
            }
        }
        Ok(())
    }
}

/// Dispatch kind of a method referenced through reflection
fn dispatch_kind(
    method: &str,
    context: DeclContextKind,
    referrer: &str,
) -> Result<CallKind, IndexError> {
    match context {
        DeclContextKind::Class => Ok(CallKind::VTable),
        DeclContextKind::Protocol => Ok(CallKind::Witness),
        DeclContextKind::Other => Err(IndexError::InvalidReflectionTarget {
            method: method.to_string(),
            referrer: referrer.to_string(),
        }),
    }
}

/// Builds the summary index of a whole module
pub struct ModuleSummaryIndexer<'a> {
    facts: &'a ModuleFacts,
    index: ModuleSummaryIndex,
}

impl<'a> ModuleSummaryIndexer<'a> {
    pub fn new(facts: &'a ModuleFacts) -> Self {
        Self {
            facts,
            index: ModuleSummaryIndex::new(facts.name.clone()),
        }
    }

    pub fn index(mut self) -> Result<ModuleSummaryIndex, IndexError> {
        for function in &self.facts.functions {
            let summary = FunctionSummaryIndexer::new(function).index()?;
            debug!(
                function = %function.name,
                calls = summary.calls().len(),
                preserved = summary.is_preserved(),
                "Indexed function"
            );
            self.index.insert_function(summary)?;
        }

        for table in &self.facts.witness_tables {
            self.index_witness_table(table)?;
        }

        for table in &self.facts.vtables {
            self.index_vtable(table)?;
        }

        // Properties last, so their methods see every registered implementation.
        for property in &self.facts.properties {
            self.preserve_key_path_functions(property)?;
        }

        Ok(self.index)
    }

    fn index_witness_table(&mut self, table: &WitnessTableFacts) -> Result<(), IndexError> {
        let external = table.is_possibly_used_externally();
        for entry in &table.entries {
            let Some(witness) = &entry.witness else {
                continue;
            };
            self.index
                .add_implementation(VirtualSlot::witness(&entry.requirement), guid_of(witness));

            if external {
                let referrer = format!("witness table `{}`", table.conformance);
                self.ensure_preserved(witness, &referrer)?;
            }
        }
        Ok(())
    }

    fn index_vtable(&mut self, table: &VTableFacts) -> Result<(), IndexError> {
        for entry in &table.entries {
            let referrer = format!("vtable `{}`", table.class);

            // The runtime's release path calls destructors without any
            // visible call edge.
            if entry.method_kind.is_destructor() {
                self.ensure_preserved(&entry.implementation, &referrer)?;
            }

            if entry.entry_kind == VTableEntryKind::Override && entry.method_external {
                self.ensure_preserved(&entry.implementation, &referrer)?;
            }

            self.index.add_implementation(
                VirtualSlot::vtable(&entry.method),
                guid_of(&entry.implementation),
            );
        }
        Ok(())
    }

    fn preserve_key_path_functions(&mut self, property: &PropertyFacts) -> Result<(), IndexError> {
        let Some(components) = &property.component else {
            return Ok(());
        };

        let referrer = format!("key path of `{}`", property.name);
        for component in components {
            match component {
                ReflectionComponent::Function { name } => self.ensure_preserved(name, &referrer)?,
                ReflectionComponent::Method { name, context } => {
                    let slot = match dispatch_kind(name, *context, &property.name)? {
                        CallKind::Witness => VirtualSlot::witness(name),
                        _ => VirtualSlot::vtable(name),
                    };
                    self.ensure_slot_preserved(slot, &referrer)?;
                }
            }
        }
        Ok(())
    }

    fn ensure_preserved(&mut self, name: &str, referrer: &str) -> Result<(), IndexError> {
        self.preserve_guid(guid_of(name), referrer)
            .map_err(|_| IndexError::UnknownFunction {
                name: name.to_string(),
                referrer: referrer.to_string(),
            })
    }

    fn ensure_slot_preserved(&mut self, slot: VirtualSlot, referrer: &str) -> Result<(), IndexError> {
        let impls: Vec<Guid> = self.index.implementations(slot).collect();
        for guid in impls {
            self.preserve_guid(guid, referrer)
                .map_err(|guid| IndexError::UnknownFunction {
                    name: format!("({})", guid),
                    referrer: referrer.to_string(),
                })?;
        }
        Ok(())
    }

    fn preserve_guid(&mut self, guid: Guid, referrer: &str) -> Result<(), Guid> {
        let summary = self.index.function_mut(guid).ok_or(guid)?;
        if !summary.is_preserved() {
            debug!(function = %summary.label(), referrer, "Preserving function");
            summary.mark_preserved();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::{MethodKind, VTableEntry, WitnessEntry};

    fn make_function(name: &str, facts: Vec<Fact>) -> FunctionFacts {
        facts
            .into_iter()
            .fold(FunctionFacts::new(name), FunctionFacts::with_fact)
    }

    fn direct(callee: &str) -> Fact {
        Fact::DirectCall {
            callee: callee.to_string(),
        }
    }

    fn method(name: &str, context: DeclContextKind) -> ReflectionComponent {
        ReflectionComponent::Method {
            name: name.to_string(),
            context,
        }
    }

    fn make_vtable_entry(method: &str, implementation: &str) -> VTableEntry {
        VTableEntry {
            method: method.to_string(),
            implementation: implementation.to_string(),
            method_kind: MethodKind::Normal,
            entry_kind: VTableEntryKind::Normal,
            method_external: false,
        }
    }

    #[test]
    fn test_classifies_each_fact_kind() {
        let facts = make_function(
            "f",
            vec![
                direct("g"),
                Fact::WitnessCall {
                    requirement: "P.req".into(),
                },
                Fact::VTableCall {
                    method: "C.m".into(),
                },
                Fact::TypeRef {
                    type_name: "T".into(),
                },
            ],
        );

        let summary = FunctionSummaryIndexer::new(&facts).index().unwrap();

        let kinds: Vec<_> = summary.calls().iter().map(|c| c.kind).collect();
        assert_eq!(kinds, vec![CallKind::Direct, CallKind::Witness, CallKind::VTable]);
        assert_eq!(summary.calls()[1].target, guid_of("P.req"));
        assert_eq!(summary.calls()[1].debug_name, "P.req");
        assert_eq!(summary.type_refs().collect::<Vec<_>>(), vec![guid_of("T")]);
        assert!(!summary.is_preserved());
    }

    #[test]
    fn test_reflection_reference_decomposes() {
        let facts = make_function(
            "f",
            vec![Fact::ReflectionRef {
                components: vec![
                    ReflectionComponent::Function {
                        name: "getter".into(),
                    },
                    method("C.prop", DeclContextKind::Class),
                    method("P.prop", DeclContextKind::Protocol),
                ],
            }],
        );

        let summary = FunctionSummaryIndexer::new(&facts).index().unwrap();

        assert_eq!(
            summary.calls(),
            &[
                Call::direct(guid_of("getter"), "getter"),
                Call::new(CallKind::VTable, guid_of("C.prop"), "C.prop"),
                Call::new(CallKind::Witness, guid_of("P.prop"), "P.prop"),
            ]
        );
    }

    #[test]
    fn test_reflection_reference_to_struct_method_is_fatal() {
        let facts = make_function(
            "f",
            vec![Fact::ReflectionRef {
                components: vec![method("S.m", DeclContextKind::Other)],
            }],
        );

        let err = FunctionSummaryIndexer::new(&facts).index().unwrap_err();
        assert_eq!(err.code(), "E-INDEX-001");
    }

    #[test]
    fn test_foreign_functions_are_preserved() {
        let mut objc = make_function("objc", vec![]);
        objc.foreign_method = true;
        let mut cdecl = make_function("cdecl", vec![]);
        cdecl.has_foreign_references = true;

        assert!(FunctionSummaryIndexer::new(&objc).index().unwrap().is_preserved());
        assert!(FunctionSummaryIndexer::new(&cdecl).index().unwrap().is_preserved());
    }

    #[test]
    fn test_local_witness_table_registers_without_preserving() {
        let mut module = ModuleFacts::new("m");
        module.functions.push(make_function("W", vec![]));
        module.witness_tables.push(WitnessTableFacts {
            conformance: "S: P".into(),
            entries: vec![
                WitnessEntry {
                    requirement: "P.r".into(),
                    witness: Some("W".into()),
                },
                WitnessEntry {
                    requirement: "P.optional".into(),
                    witness: None,
                },
            ],
            ..WitnessTableFacts::default()
        });

        let index = ModuleSummaryIndexer::new(&module).index().unwrap();

        let impls: Vec<_> = index.implementations(VirtualSlot::witness("P.r")).collect();
        assert_eq!(impls, vec![guid_of("W")]);
        assert_eq!(index.implementations(VirtualSlot::witness("P.optional")).count(), 0);
        assert!(!index.function(guid_of("W")).unwrap().is_preserved());
    }

    #[test]
    fn test_external_protocol_preserves_witness() {
        let mut module = ModuleFacts::new("m");
        module.functions.push(make_function("W", vec![]));
        module.witness_tables.push(WitnessTableFacts {
            protocol_external: true,
            entries: vec![WitnessEntry {
                requirement: "P.r".into(),
                witness: Some("W".into()),
            }],
            ..WitnessTableFacts::default()
        });

        let index = ModuleSummaryIndexer::new(&module).index().unwrap();
        assert!(index.function(guid_of("W")).unwrap().is_preserved());
    }

    #[test]
    fn test_external_conforming_type_preserves_witness() {
        let mut module = ModuleFacts::new("m");
        module.functions.push(make_function("W", vec![]));
        module.functions.push(make_function("L", vec![]));
        module.witness_tables.push(WitnessTableFacts {
            conformance: "Foreign: P".into(),
            conforming_type_external: true,
            entries: vec![WitnessEntry {
                requirement: "P.r".into(),
                witness: Some("W".into()),
            }],
            ..WitnessTableFacts::default()
        });
        module.witness_tables.push(WitnessTableFacts {
            conformance: "Local: P".into(),
            entries: vec![WitnessEntry {
                requirement: "P.r".into(),
                witness: Some("L".into()),
            }],
            ..WitnessTableFacts::default()
        });

        let index = ModuleSummaryIndexer::new(&module).index().unwrap();

        assert!(index.function(guid_of("W")).unwrap().is_preserved());
        assert!(!index.function(guid_of("L")).unwrap().is_preserved());
        assert_eq!(index.implementations(VirtualSlot::witness("P.r")).count(), 2);
    }

    #[test]
    fn test_deallocator_is_preserved() {
        let mut module = ModuleFacts::new("m");
        module.functions.push(make_function("C.deinit", vec![]));
        let mut entry = make_vtable_entry("C.deallocating", "C.deinit");
        entry.method_kind = MethodKind::Deallocator;
        module.vtables.push(VTableFacts {
            class: "C".into(),
            entries: vec![entry],
        });

        let index = ModuleSummaryIndexer::new(&module).index().unwrap();

        assert!(index.function(guid_of("C.deinit")).unwrap().is_preserved());
        assert_eq!(
            index.implementations(VirtualSlot::vtable("C.deallocating")).collect::<Vec<_>>(),
            vec![guid_of("C.deinit")]
        );
    }

    #[test]
    fn test_override_of_external_method_is_preserved() {
        let mut module = ModuleFacts::new("m");
        for name in ["D.m", "D.n", "D.k"] {
            module.functions.push(make_function(name, vec![]));
        }

        let mut external_override = make_vtable_entry("Base.m", "D.m");
        external_override.entry_kind = VTableEntryKind::Override;
        external_override.method_external = true;

        let mut local_override = make_vtable_entry("Local.n", "D.n");
        local_override.entry_kind = VTableEntryKind::Override;

        let mut inherited_external = make_vtable_entry("Base.k", "D.k");
        inherited_external.entry_kind = VTableEntryKind::Inherited;
        inherited_external.method_external = true;

        module.vtables.push(VTableFacts {
            class: "D".into(),
            entries: vec![external_override, local_override, inherited_external],
        });

        let index = ModuleSummaryIndexer::new(&module).index().unwrap();

        assert!(index.function(guid_of("D.m")).unwrap().is_preserved());
        assert!(!index.function(guid_of("D.n")).unwrap().is_preserved());
        assert!(!index.function(guid_of("D.k")).unwrap().is_preserved());
    }

    #[test]
    fn test_preserving_unknown_function_is_fatal() {
        let mut module = ModuleFacts::new("m");
        let mut entry = make_vtable_entry("C.deallocating", "missing");
        entry.method_kind = MethodKind::IvarDestroyer;
        module.vtables.push(VTableFacts {
            class: "C".into(),
            entries: vec![entry],
        });

        let err = ModuleSummaryIndexer::new(&module).index().unwrap_err();
        assert_eq!(err.code(), "E-INDEX-002");
    }

    #[test]
    fn test_duplicate_function_facts_are_rejected() {
        let mut module = ModuleFacts::new("m");
        module.functions.push(make_function("f", vec![]));
        module.functions.push(make_function("f", vec![]));

        let err = ModuleSummaryIndexer::new(&module).index().unwrap_err();
        assert_eq!(err.code(), "E-INDEX-003");
    }

    #[test]
    fn test_key_path_property_preserves_functions_and_implementations() {
        let mut module = ModuleFacts::new("m");
        for name in ["getter", "C.prop.impl", "other"] {
            module.functions.push(make_function(name, vec![]));
        }
        module.vtables.push(VTableFacts {
            class: "C".into(),
            entries: vec![make_vtable_entry("C.prop", "C.prop.impl")],
        });
        module.properties.push(PropertyFacts {
            name: "C.prop".into(),
            component: Some(vec![
                ReflectionComponent::Function {
                    name: "getter".into(),
                },
                method("C.prop", DeclContextKind::Class),
            ]),
        });
        module.properties.push(PropertyFacts {
            name: "plain".into(),
            component: None,
        });

        let index = ModuleSummaryIndexer::new(&module).index().unwrap();

        assert!(index.function(guid_of("getter")).unwrap().is_preserved());
        assert!(index.function(guid_of("C.prop.impl")).unwrap().is_preserved());
        assert!(!index.function(guid_of("other")).unwrap().is_preserved());
    }

    #[test]
    fn test_key_path_property_on_struct_method_is_fatal() {
        let mut module = ModuleFacts::new("m");
        module.properties.push(PropertyFacts {
            name: "S.prop".into(),
            component: Some(vec![method("S.prop", DeclContextKind::Other)]),
        });

        let err = ModuleSummaryIndexer::new(&module).index().unwrap_err();
        assert_eq!(err.code(), "E-INDEX-001");
    }
}
