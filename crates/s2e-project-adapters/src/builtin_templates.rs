//! Built-in templates.
//!
//! These ship inside the binary so a fresh environment works without any
//! template directory. A directory configured as `templates.local_path`
//! can shadow any of them by file name (see
//! [`TemplateLibrary::load_overrides`](crate::TemplateLibrary::load_overrides)).
//!
//! | Name                 | Rendered into                    |
//! |----------------------|----------------------------------|
//! | `bootstrap.cgc.sh`   | `bootstrap.sh` (CGC projects)    |
//! | `s2e-config.lua`     | `s2e-config.lua`                 |
//! | `s2e-config.cgc.lua` | included by `s2e-config.lua`     |
//! | `models.lua`         | `models.lua`, and included       |
//! | `library.lua`        | `library.lua`                    |

const BOOTSTRAP_CGC: &str = include_str!("../templates/bootstrap.cgc.sh");
const S2E_CONFIG: &str = include_str!("../templates/s2e-config.lua");
const S2E_CONFIG_CGC: &str = include_str!("../templates/s2e-config.cgc.lua");
const MODELS: &str = include_str!("../templates/models.lua");
const LIBRARY: &str = include_str!("../templates/library.lua");

static TEMPLATES: &[(&str, &str)] = &[
    ("bootstrap.cgc.sh", BOOTSTRAP_CGC),
    ("s2e-config.lua", S2E_CONFIG),
    ("s2e-config.cgc.lua", S2E_CONFIG_CGC),
    ("models.lua", MODELS),
    ("library.lua", LIBRARY),
];

/// All built-in templates as `(name, source)` pairs.
pub fn all_templates() -> &'static [(&'static str, &'static str)] {
    TEMPLATES
}
