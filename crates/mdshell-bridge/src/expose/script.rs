//! A [`UiContext`] that produces the UI-side init script for a webview.
//!
//! Every capability becomes an object of stubs that forward to
//! `window.__mdshell.invoke("<capability>::<operation>", args)`. Bridge
//! registrations are frozen and non-writable; plain assignments are not.

use std::collections::BTreeSet;

use mdshell_common::BridgeError;
use serde_json::Value;

use super::UiContext;
use crate::capability::Capability;
use crate::ipc::IPC_INIT_SCRIPT;

#[derive(Debug, Default)]
pub struct ScriptContext {
    names: BTreeSet<&'static str>,
    statements: Vec<String>,
}

impl ScriptContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// The capability statements only, wrapped in one function scope.
    pub fn capabilities_script(&self) -> String {
        format!("(function() {{\n{}\n}})();\n", self.statements.join("\n"))
    }

    /// Full init script: IPC shim first, then the capabilities that use it.
    pub fn into_script(self) -> String {
        let mut script = String::from(IPC_INIT_SCRIPT);
        script.push_str(&self.capabilities_script());
        script
    }
}

impl UiContext for ScriptContext {
    fn expose_in_main_world(
        &mut self,
        name: &'static str,
        capability: Capability,
    ) -> Result<(), BridgeError> {
        if !self.names.insert(name) {
            return Err(BridgeError::NameCollision(name.to_string()));
        }
        self.statements.push(format!(
            "    Object.defineProperty(window, {}, {{ value: {}, writable: false, configurable: false, enumerable: true }});",
            js_str(name),
            render_capability(&capability, true)
        ));
        Ok(())
    }

    fn assign_global(&mut self, name: &'static str, capability: Capability) {
        self.names.insert(name);
        self.statements.push(format!(
            "    window[{}] = {};",
            js_str(name),
            render_capability(&capability, false)
        ));
    }
}

fn js_str(s: &str) -> String {
    Value::from(s).to_string()
}

fn object_literal(members: Vec<String>, freeze: bool) -> String {
    let body = format!("{{ {} }}", members.join(", "));
    if freeze {
        format!("Object.freeze({body})")
    } else {
        body
    }
}

fn render_capability(capability: &Capability, freeze: bool) -> String {
    if let Some(value) = capability.as_value() {
        return value.to_string();
    }

    let mut members = Vec::new();
    if matches!(capability, Capability::Bridge(_)) {
        members.push(format!("{}: window.__mdshell", js_str("ipcRenderer")));
    }
    for (name, value) in capability.constants() {
        members.push(format!("{}: {}", js_str(name), value));
    }

    // "shell.openExternal" lands in a nested "shell" object.
    let mut groups: Vec<(&str, Vec<String>)> = Vec::new();
    for op in capability.operations() {
        let kind = format!("{}::{op}", capability.name());
        let stub = format!(
            "function() {{ return window.__mdshell.invoke({}, Array.prototype.slice.call(arguments)); }}",
            js_str(&kind)
        );
        match op.split_once('.') {
            Some((group, member)) => {
                let member = format!("{}: {stub}", js_str(member));
                match groups.iter_mut().find(|(g, _)| *g == group) {
                    Some((_, items)) => items.push(member),
                    None => groups.push((group, vec![member])),
                }
            }
            None => members.push(format!("{}: {stub}", js_str(op))),
        }
    }
    for (group, items) in groups {
        members.push(format!("{}: {}", js_str(group), object_literal(items, freeze)));
    }

    object_literal(members, freeze)
}
