//! Set List Component
//!
//! Fetches `/sets` once on mount and renders a Movement / Volume / Intensity
//! table. A failed fetch is logged to the console and the table stays empty.

use leptos::*;

use crate::api;
use crate::state::sets::{SetRecord, COLUMNS, HEADING};

/// Table of all sets
#[component]
pub fn SetList() -> impl IntoView {
    let sets = create_rw_signal(Vec::<SetRecord>::new());

    // No tracked signals, so this runs once per mount
    create_effect(move |_| {
        spawn_local(async move {
            match api::fetch_sets().await {
                Ok(records) => {
                    // Records come back if the component was unmounted meanwhile
                    if sets.try_set(records).is_some() {
                        web_sys::console::warn_1(&"Set list unmounted before response".into());
                    }
                }
                Err(e) => {
                    web_sys::console::error_1(&format!("Failed to fetch sets: {}", e).into());
                }
            }
        });
    });

    view! {
        <div>
            <h1 style="margin-bottom: 40px">{HEADING}</h1>
            <table class="table">
                <thead>
                    <tr>
                        {COLUMNS.into_iter().map(|column| view! { <th>{column}</th> }).collect_view()}
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || sets.get().into_iter().enumerate()
                        key=|(index, _)| *index
                        children=move |(_, record)| {
                            let [movement, volume, intensity] = record.cells();
                            view! {
                                <tr>
                                    <td>{movement}</td>
                                    <td>{volume}</td>
                                    <td>{intensity}</td>
                                </tr>
                            }
                        }
                    />
                </tbody>
            </table>
        </div>
    }
}
