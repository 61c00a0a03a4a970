//! The `CerbRecord` trait shared by every generated wrapper.

use proc_macro2::TokenStream;
use quote::quote;

/// Generates the `CerbRecord` trait.
///
/// Wrappers implement the four required methods; everything else is a
/// default method delegating to [`cerb::Record`].
pub fn generate_base_trait() -> TokenStream {
    quote! {
        /// Lifecycle shared by every generated record type.
        #[allow(async_fn_in_trait)]
        pub trait CerbRecord: Sized {
            /// Static metadata of this record type's context.
            fn descriptor() -> &'static RecordDescriptor;

            /// Wraps a record handle without any remote call.
            fn from_record(record: Record) -> Self;

            fn record(&self) -> &Record;

            fn record_mut(&mut self) -> &mut Record;

            fn id(&self) -> u64 {
                self.record().id()
            }

            /// Wraps data the server already returned.
            fn from_server_data(client: &CerbClient, data: Map<String, Value>) -> Result<Self, CerbError> {
                Record::from_server_data(client, Self::descriptor(), data).map(Self::from_record)
            }

            /// Creates a new record on the server. Requires `create` in the ACL.
            async fn create(client: &CerbClient, fields: &Fields) -> Result<Self, CerbError> {
                Record::create(client, Self::descriptor(), fields)
                    .await
                    .map(Self::from_record)
            }

            async fn load(client: &CerbClient, id: u64) -> Result<Self, CerbError> {
                Record::load(client, Self::descriptor(), id)
                    .await
                    .map(Self::from_record)
            }

            async fn reload(&mut self) -> Result<(), CerbError> {
                self.record_mut().reload().await
            }

            async fn find_many(client: &CerbClient, query: &str, limit: u32) -> Result<Vec<Self>, CerbError> {
                let records = Record::search(client, Self::descriptor(), query, limit).await?;
                Ok(records.into_iter().map(Self::from_record).collect())
            }

            /// Returns the single record matching `query`.
            async fn find_one(client: &CerbClient, query: &str) -> Result<Self, CerbError> {
                Record::find_one(client, Self::descriptor(), query)
                    .await
                    .map(Self::from_record)
            }

            async fn link<R: CerbRecord>(&self, others: &[&R]) -> Result<(), CerbError> {
                let records: Vec<&Record> = others.iter().map(|other| other.record()).collect();
                self.record().link(&records).await
            }

            async fn unlink<R: CerbRecord>(&self, others: &[&R]) -> Result<(), CerbError> {
                let records: Vec<&Record> = others.iter().map(|other| other.record()).collect();
                self.record().unlink(&records).await
            }

            /// Loads the linked records of type `R`.
            async fn load_links<R: CerbRecord>(&self) -> Result<Vec<R>, CerbError> {
                let records = self.record().load_links(R::descriptor()).await?;
                Ok(records.into_iter().map(R::from_record).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_trait_is_valid_rust() {
        let tokens = generate_base_trait();
        let file = syn::parse2::<syn::File>(tokens).expect("trait should parse");
        assert_eq!(file.items.len(), 1);
    }

    #[test]
    fn base_trait_has_lifecycle_methods() {
        let code = generate_base_trait().to_string();
        for method in [
            "fn descriptor",
            "fn from_server_data",
            "async fn create",
            "async fn load",
            "async fn reload",
            "async fn find_many",
            "async fn find_one",
            "async fn link",
            "async fn unlink",
            "async fn load_links",
        ] {
            assert!(code.contains(method), "missing {method}");
        }
    }
}
