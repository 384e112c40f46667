use std::collections::{BTreeMap, HashMap};

use tracing::warn;

/// Phone to page when a product has no registered owner.
pub const DEFAULT_OWNER: &str = "15399015948";

/// Product name -> owner phone, inverted from the config's
/// phone -> product-list table. Built once at startup, read-only after.
#[derive(Debug, Default, Clone)]
pub struct OwnerMap {
    owners: HashMap<String, String>,
}

impl OwnerMap {
    /// Invert `phone -> [products]` groups into a product lookup table.
    ///
    /// Keys that are not 11-digit phone numbers with a leading `1` are
    /// skipped. A product claimed by more than one phone keeps the last
    /// assignment; both cases are logged rather than failing the run.
    pub fn from_groups(groups: &BTreeMap<String, Vec<String>>) -> Self {
        let mut owners = HashMap::new();
        for (phone, products) in groups {
            if !is_phone(phone) {
                warn!(key = %phone, "owners key is not an 11-digit phone number, skipping");
                continue;
            }
            for product in products {
                if let Some(prev) = owners.insert(product.clone(), phone.clone()) {
                    if prev != *phone {
                        warn!(
                            product = %product,
                            previous = %prev,
                            current = %phone,
                            "product claimed by more than one owner, keeping the last"
                        );
                    }
                }
            }
        }
        Self { owners }
    }

    /// Look up the owner for a product label like `"ProdA [C++ Edition]"`.
    /// The key is everything before the first `[`, trimmed; labels without
    /// a `[` have no owner.
    pub fn find(&self, label: &str) -> Option<&str> {
        let (key, _) = label.split_once('[')?;
        self.owners.get(key.trim()).map(String::as_str)
    }

    /// `find` with the fallback owner applied.
    pub fn resolve(&self, label: &str) -> &str {
        self.find(label).unwrap_or(DEFAULT_OWNER)
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

fn is_phone(s: &str) -> bool {
    s.len() == 11 && s.starts_with('1') && s.bytes().all(|b| b.is_ascii_digit())
}
