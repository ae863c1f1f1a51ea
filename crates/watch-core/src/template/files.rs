//! The fixed set of template files a sync run manages
//!
//! Membership is static per run; nothing is derived from the remote
//! repository's actual listing.

use std::borrow::Cow;

/// Files downloaded from the template repository, in order.
pub const TRACKED_FILES: &[&str] = &[
    "nodemon.json",
    "tsconfig.json",
    "tsconfig.spec.json",
    ".prettierrc",
    ".gitignore",
    "jest.config.ts",
    ".eslintrc.js",
];

/// Files the second substitution pass runs over: everything downloaded plus
/// files the template never provides but the project usually has.
pub const SECOND_PASS_FILES: &[&str] = &[
    "nodemon.json",
    "tsconfig.json",
    "tsconfig.spec.json",
    ".prettierrc",
    ".gitignore",
    "jest.config.ts",
    ".eslintrc.js",
    "README.md",
    "package-lock.json",
];

const ESLINT_CONFIG: &str = ".eslintrc.js";

/// Local destination name for a tracked file. An ES-module project cannot
/// load a CommonJS `.eslintrc.js`, so its extension flips to `.cjs`.
pub fn destination_name(file_name: &str, local_is_module: bool) -> Cow<'_, str> {
    if file_name == ESLINT_CONFIG && local_is_module {
        Cow::Owned(file_name.replacen(".js", ".cjs", 1))
    } else {
        Cow::Borrowed(file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eslint_config_renamed_for_module_projects() {
        assert_eq!(destination_name(".eslintrc.js", true), ".eslintrc.cjs");
    }

    #[test]
    fn eslint_config_kept_for_commonjs_projects() {
        assert_eq!(destination_name(".eslintrc.js", false), ".eslintrc.js");
    }

    #[test]
    fn other_files_never_renamed() {
        assert_eq!(destination_name("jest.config.ts", true), "jest.config.ts");
        assert_eq!(destination_name(".gitignore", true), ".gitignore");
    }

    #[test]
    fn second_pass_covers_every_download() {
        for file in TRACKED_FILES {
            assert!(SECOND_PASS_FILES.contains(file));
        }
    }
}
