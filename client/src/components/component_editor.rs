//! Sidebar editor for one component.
//!
//! DESIGN
//! ======
//! Known kinds get labelled inputs for their common fields; every kind also
//! gets a raw JSON box so fields without a dedicated input stay editable.
//! Inputs only raise callbacks. The builder page owns the session and
//! decides what is local (data edits) and what round-trips (toggle, move,
//! delete).

#[cfg(test)]
#[path = "component_editor_test.rs"]
mod component_editor_test;

use blocks::{Component, ComponentData, ComponentId};
use leptos::prelude::*;
use serde_json::Value;

use crate::registry::ComponentKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldInput {
    Line,
    Text,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub input: FieldInput,
}

const fn line(key: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec { key, label, input: FieldInput::Line }
}

const fn text(key: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec { key, label, input: FieldInput::Text }
}

const HERO_FIELDS: &[FieldSpec] = &[
    line("title", "Title"),
    line("subtitle", "Subtitle"),
    line("image_url", "Image URL"),
    line("cta_label", "Button label"),
    line("cta_href", "Button link"),
];
const HEADING_ONLY: &[FieldSpec] = &[line("heading", "Heading")];
const RICH_TEXT_FIELDS: &[FieldSpec] = &[text("body", "Body (markdown)")];
const CTA_FIELDS: &[FieldSpec] = &[
    line("heading", "Heading"),
    text("body", "Body"),
    line("button_label", "Button label"),
    line("button_href", "Button link"),
];

/// Inputs shown for a component type. Unknown types get none.
#[must_use]
pub fn fields_for(component_type: &str) -> &'static [FieldSpec] {
    match ComponentKind::from_tag(component_type) {
        Some(ComponentKind::Hero) => HERO_FIELDS,
        Some(ComponentKind::PopularTools | ComponentKind::CategoryGrid | ComponentKind::Faq) => HEADING_ONLY,
        Some(ComponentKind::RichText) => RICH_TEXT_FIELDS,
        Some(ComponentKind::CallToAction) => CTA_FIELDS,
        None => &[],
    }
}

/// Current text of a field for an input's value.
#[must_use]
pub fn field_text(data: &ComponentData, key: &str) -> String {
    match data.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// Parse the raw JSON box. Must be an object.
///
/// # Errors
///
/// Returns a display message for invalid JSON or a non-object value.
pub fn parse_data_json(raw: &str) -> Result<ComponentData, String> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err("data must be a JSON object".to_owned()),
        Err(e) => Err(format!("invalid JSON: {e}")),
    }
}

#[component]
pub fn ComponentEditor(
    component: Component,
    #[prop(optional)] selected: bool,
    on_select: Callback<ComponentId>,
    on_field: Callback<(ComponentId, String, Value)>,
    on_replace: Callback<(ComponentId, ComponentData)>,
    on_toggle: Callback<(ComponentId, bool)>,
    on_move: Callback<(ComponentId, i64)>,
    on_delete: Callback<ComponentId>,
) -> impl IntoView {
    let id = component.id;
    let active = component.active;
    let label = ComponentKind::from_tag(&component.component_type)
        .map_or_else(|| component.component_type.clone(), |k| k.label().to_owned());
    let raw_json = serde_json::to_string_pretty(&component.data).unwrap_or_default();
    let json_error = RwSignal::new(None::<String>);

    let inputs = fields_for(&component.component_type)
        .iter()
        .map(move |spec| {
            let key = spec.key;
            let value = field_text(&component.data, key);
            let on_input = move |ev: leptos::ev::Event| {
                on_field.run((id, key.to_owned(), Value::String(event_target_value(&ev))));
            };
            let input = match spec.input {
                FieldInput::Line => view! { <input type="text" prop:value=value on:input=on_input/> }.into_any(),
                FieldInput::Text => view! { <textarea rows="6" prop:value=value on:input=on_input></textarea> }.into_any(),
            };
            view! {
                <label class="field">
                    <span class="field__label">{spec.label}</span>
                    {input}
                </label>
            }
        })
        .collect_view();

    view! {
        <article class="component-editor" class:component-editor--selected=selected class:component-editor--inactive=!active>
            <header class="component-editor__header" on:click=move |_| on_select.run(id)>
                <span class="component-editor__type">{label}</span>
                <span class="component-editor__id">"#"{id}</span>
            </header>
            {selected.then(|| view! {
                <div class="component-editor__body">
                    {inputs}
                    <label class="field">
                        <span class="field__label">"Data (JSON)"</span>
                        <textarea
                            class="field__json"
                            rows="8"
                            prop:value=raw_json
                            on:change=move |ev| match parse_data_json(&event_target_value(&ev)) {
                                Ok(data) => {
                                    json_error.set(None);
                                    on_replace.run((id, data));
                                }
                                Err(message) => json_error.set(Some(message)),
                            }
                        ></textarea>
                    </label>
                    {move || json_error.get().map(|e| view! { <p class="field__error">{e}</p> })}
                </div>
            })}
            <footer class="component-editor__actions">
                <button on:click=move |_| on_move.run((id, -1))>"↑"</button>
                <button on:click=move |_| on_move.run((id, 1))>"↓"</button>
                <button on:click=move |_| on_toggle.run((id, !active))>
                    {if active { "Hide" } else { "Show" }}
                </button>
                <button class="btn--danger" on:click=move |_| on_delete.run(id)>"Delete"</button>
            </footer>
        </article>
    }
}
