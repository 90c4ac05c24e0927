//! App Root Component

use leptos::*;

use crate::components::{Nav, SetList};

/// Root application component: navigation shell around the set list
#[component]
pub fn App() -> impl IntoView {
    view! {
        <div class="App">
            <Nav />
            <SetList />
        </div>
    }
}
