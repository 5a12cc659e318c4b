//! Browser renditions of the theme subsystem, emitted inline into the page.
//!
//! Both scripts share the storage key, attribute and media query with
//! [`crate::theme`], so the page and the Rust model agree on the contract.

use crate::theme::{DARK_SCHEME_QUERY, STORAGE_KEY, THEME_ATTRIBUTE};

/// Id of the button the toggle controller attaches to.
pub const TOGGLE_BUTTON_ID: &str = "theme-toggle";

/// Marker attribute identifying the pre-paint script in rendered output.
pub const BOOTSTRAP_MARKER: &str = "data-theme-bootstrap";

const BOOTSTRAP_JS: &str = r#"(function () {
  var theme = null;
  try {
    var saved = localStorage.getItem(__KEY__);
    if (saved === "light" || saved === "dark") theme = saved;
  } catch (_) {}
  if (!theme) {
    var dark = false;
    try {
      dark = !!(window.matchMedia && window.matchMedia(__QUERY__).matches);
    } catch (_) {}
    theme = dark ? "dark" : "light";
  }
  document.documentElement.setAttribute(__ATTR__, theme);
})();"#;

const TOGGLE_JS: &str = r#"(function () {
  var root = document.documentElement;
  var button = document.getElementById(__BUTTON__);

  function currentTheme() {
    return root.getAttribute(__ATTR__) === "dark" ? "dark" : "light";
  }

  function updateButton() {
    if (!button) return;
    var current = currentTheme();
    var next = current === "dark" ? "light" : "dark";
    button.textContent = current === "dark" ? "☾" : "☀";
    button.setAttribute("aria-pressed", current === "dark" ? "true" : "false");
    button.setAttribute("aria-label", "Switch to " + next + " theme");
    button.setAttribute("title", "Switch to " + next + " theme");
  }

  updateButton();

  if (button) {
    button.addEventListener("click", function () {
      var next = currentTheme() === "dark" ? "light" : "dark";
      root.setAttribute(__ATTR__, next);
      try {
        localStorage.setItem(__KEY__, next);
      } catch (_) {}
      updateButton();
    });
  }
})();"#;

/// Resolves and applies the theme before first paint. Must be inlined, blocking, in `<head>`.
pub fn bootstrap_script() -> String {
    fill(BOOTSTRAP_JS)
}

/// Flips and persists the theme when the toggle button is clicked.
pub fn toggle_script() -> String {
    fill(TOGGLE_JS)
}

fn fill(template: &str) -> String {
    template
        .replace("__KEY__", &js_string(STORAGE_KEY))
        .replace("__QUERY__", &js_string(DARK_SCHEME_QUERY))
        .replace("__ATTR__", &js_string(THEME_ATTRIBUTE))
        .replace("__BUTTON__", &js_string(TOGGLE_BUTTON_ID))
}

fn js_string(s: &str) -> String {
    serde_json::Value::from(s).to_string()
}
