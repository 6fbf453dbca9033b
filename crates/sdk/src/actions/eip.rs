//! Elastic IP actions.

use serde::{Deserialize, Serialize};
use zsdk_action::{Action, ActionSpec, CallOptions, Credentials, RestDescriptor};
use zsdk_schema::{ParameterSchema, ParameterSpec};

use crate::inventory::{EipInventory, VmNicInventory};

static GET_EIP_ATTACHABLE_VM_NICS: ActionSpec = ActionSpec::new(
    "GetEipAttachableVmNics",
    RestDescriptor::get("/eips/{eipUuid}/vm-instances/candidate-nics"),
    ParameterSchema::new(&[
        ParameterSpec::string("eipUuid"),
        ParameterSpec::string("vipUuid"),
        ParameterSpec::string("vmUuid"),
        ParameterSpec::string("vmName"),
        ParameterSpec::integer("limit").default_int(1000),
        ParameterSpec::integer("offset").default_int(0),
        ParameterSpec::list("systemTags"),
        ParameterSpec::list("userTags"),
    ]),
);

/// List the VM NICs an elastic IP can be attached to.
///
/// `eipUuid` is optional in the parameter contract, but the path needs it:
/// leaving it unset fails the call with `CLIENT.MISSING_PATH_PARAMETER`
/// before anything is sent. `limit` and `offset` default to 1000 and 0.
///
/// ```rust,no_run
/// use zsdk::actions::GetEipAttachableVmNicsAction;
/// use zsdk::Credentials;
///
/// # fn demo(client: &zsdk::Client) {
/// let result = client.call(GetEipAttachableVmNicsAction {
///     eip_uuid: Some("3f0e5b4cf6f84c5c8d1a9b1e0f2a6d77".into()),
///     vm_name: Some("web".into()),
///     credentials: Credentials::session("0bba2b7a6f1d4c43b2f8e1c4c2f3d9a1"),
///     ..Default::default()
/// });
/// for nic in result.value().map(|r| &r.inventories).into_iter().flatten() {
///     println!("{} {:?}", nic.uuid, nic.ip);
/// }
/// # }
/// ```
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetEipAttachableVmNicsAction {
    pub eip_uuid: Option<String>,
    pub vip_uuid: Option<String>,
    pub vm_uuid: Option<String>,
    pub vm_name: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub system_tags: Option<Vec<String>>,
    pub user_tags: Option<Vec<String>>,
    #[serde(skip)]
    pub credentials: Credentials,
    #[serde(skip)]
    pub options: CallOptions,
}

/// NICs returned by [`GetEipAttachableVmNicsAction`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GetEipAttachableVmNicsResult {
    pub inventories: Vec<VmNicInventory>,
}

impl Action for GetEipAttachableVmNicsAction {
    type Output = GetEipAttachableVmNicsResult;

    fn spec() -> &'static ActionSpec {
        &GET_EIP_ATTACHABLE_VM_NICS
    }

    fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    fn options(&self) -> &CallOptions {
        &self.options
    }
}

static ATTACH_EIP: ActionSpec = ActionSpec::new(
    "AttachEip",
    RestDescriptor::post("/eips/{eipUuid}/vm-instances/nics/{vmNicUuid}")
        .polled()
        .nested_under("params"),
    ParameterSchema::new(&[
        ParameterSpec::string("eipUuid").required().nonempty(),
        ParameterSpec::string("vmNicUuid").required().nonempty(),
        ParameterSpec::string("usedIpUuid"),
        ParameterSpec::list("systemTags"),
        ParameterSpec::list("userTags"),
    ]),
);

/// Attach an elastic IP to a VM NIC.
///
/// Runs as a server-side job: the client polls until it finishes.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachEipAction {
    pub eip_uuid: Option<String>,
    pub vm_nic_uuid: Option<String>,
    pub used_ip_uuid: Option<String>,
    pub system_tags: Option<Vec<String>>,
    pub user_tags: Option<Vec<String>>,
    #[serde(skip)]
    pub credentials: Credentials,
    #[serde(skip)]
    pub options: CallOptions,
}

/// The attached elastic IP.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AttachEipResult {
    pub inventory: EipInventory,
}

impl Action for AttachEipAction {
    type Output = AttachEipResult;

    fn spec() -> &'static ActionSpec {
        &ATTACH_EIP
    }

    fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    fn options(&self) -> &CallOptions {
        &self.options
    }
}
