//! Navigation Component
//!
//! Static header bar. The links are placeholders with no routing behind them.

use leptos::*;

/// Navigation header component
#[component]
pub fn Nav() -> impl IntoView {
    view! {
        <nav class="navbar navbar-expand-lg navbar-light bg-light">
            <div class="container">
                <a class="navbar-brand" href="#home">"Sets"</a>
                <div class="navbar-collapse" id="basic-navbar-nav">
                    <div class="navbar-nav me-auto">
                        <NavLink href="#home" label="Home" />
                        <NavLink href="#link" label="Link" />
                    </div>
                </div>
            </div>
        </nav>
    }
}

/// Individual navigation link
#[component]
fn NavLink(
    href: &'static str,
    label: &'static str,
) -> impl IntoView {
    view! {
        <a class="nav-link" href=href>
            {label}
        </a>
    }
}
