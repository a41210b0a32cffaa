//! Wire types of the Dynatrace configuration API (v1)

use dynext_domain::{CreatedExtension, DynextError, ExtensionId, ExtensionListPage, ExtensionSummary};
use serde::Deserialize;

/// Response of `GET /extensions`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GetExtensionsResponse {
    #[serde(default)]
    pub extensions: Vec<ExtensionDto>,
    #[serde(default)]
    pub total_results: u64,
    #[serde(default)]
    pub next_page_key: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExtensionDto {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub extension_type: String,
}

impl From<GetExtensionsResponse> for ExtensionListPage {
    fn from(value: GetExtensionsResponse) -> Self {
        let extensions = value
            .extensions
            .into_iter()
            .map(|dto| ExtensionSummary {
                id: ExtensionId::new(dto.id),
                name: dto.name,
                extension_type: dto.extension_type,
            })
            .collect();
        ExtensionListPage::new(extensions, value.total_results, value.next_page_key)
    }
}

/// Response of `POST /extensions`. Only the identity is used.
#[derive(Debug, Deserialize)]
pub(crate) struct CreateExtensionResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl TryFrom<CreateExtensionResponse> for CreatedExtension {
    type Error = DynextError;

    fn try_from(value: CreateExtensionResponse) -> Result<Self, Self::Error> {
        let id = value
            .id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| DynextError::decoding("create response did not contain an extension id"))?;

        Ok(CreatedExtension { id: ExtensionId::new(id), name: value.name.unwrap_or_default() })
    }
}
