//! Insurer records and their templates

use std::collections::BTreeMap;
use std::fmt;

use alfa_grid::Row;
use serde::Deserialize;
use serde::Serialize;

/// Line of business a policy belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PolicyType {
    Hogar,
    Vehiculo,
    Copropiedad,
    Otro,
}

impl PolicyType {
    pub const ALL: [PolicyType; 4] = [
        PolicyType::Hogar,
        PolicyType::Vehiculo,
        PolicyType::Copropiedad,
        PolicyType::Otro,
    ];

    /// Returns the wire name, e.g. `"HOGAR"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyType::Hogar => "HOGAR",
            PolicyType::Vehiculo => "VEHICULO",
            PolicyType::Copropiedad => "COPROPIEDAD",
            PolicyType::Otro => "OTRO",
        }
    }
}

impl fmt::Display for PolicyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Commission percentage by policy type.
pub type Commissions = BTreeMap<PolicyType, f64>;

/// Liability sub-limits for vehicle (`rc_veh`) and co-ownership (`rce_cop`) policies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubLimits {
    #[serde(rename = "sublimite_rc_veh_bienes_terceros", default, skip_serializing_if = "Option::is_none")]
    pub vehicle_third_party_property: Option<f64>,
    #[serde(rename = "sublimite_rc_veh_amparo_patrimonial", default, skip_serializing_if = "Option::is_none")]
    pub vehicle_patrimonial: Option<f64>,
    #[serde(rename = "sublimite_rc_veh_muerte_una_persona", default, skip_serializing_if = "Option::is_none")]
    pub vehicle_death_one_person: Option<f64>,
    #[serde(rename = "sublimite_rc_veh_muerte_mas_personas", default, skip_serializing_if = "Option::is_none")]
    pub vehicle_death_several_people: Option<f64>,
    #[serde(rename = "sublimite_rce_cop_contratistas", default, skip_serializing_if = "Option::is_none")]
    pub coownership_contractors: Option<f64>,
    #[serde(rename = "sublimite_rce_cop_cruzada", default, skip_serializing_if = "Option::is_none")]
    pub coownership_cross: Option<f64>,
    #[serde(rename = "sublimite_rce_cop_patronal", default, skip_serializing_if = "Option::is_none")]
    pub coownership_employer: Option<f64>,
    #[serde(rename = "sublimite_rce_cop_parqueaderos", default, skip_serializing_if = "Option::is_none")]
    pub coownership_parking: Option<f64>,
    #[serde(rename = "sublimite_rce_cop_gastos_medicos", default, skip_serializing_if = "Option::is_none")]
    pub coownership_medical: Option<f64>,
}

/// A deductible template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deductible {
    pub id: i64,
    #[serde(rename = "aseguradora_id")]
    pub insurer_id: i64,
    #[serde(rename = "tipo_poliza")]
    pub policy_type: PolicyType,
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "tipo_deducible", default)]
    pub deductible_type: Option<String>,
    #[serde(rename = "valor_porcentaje", default)]
    pub percentage: Option<f64>,
    #[serde(rename = "valor_minimo", default)]
    pub minimum: Option<f64>,
}

/// Kind of a coverage template item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoverageItemType {
    Cobertura,
    Asistencia,
    Diferenciador,
}

/// A coverage, assistance or differentiator template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coverage {
    pub id: i64,
    #[serde(rename = "aseguradora_id")]
    pub insurer_id: i64,
    #[serde(rename = "tipo_poliza")]
    pub policy_type: PolicyType,
    #[serde(rename = "tipo_item")]
    pub item_type: CoverageItemType,
    #[serde(rename = "nombre_item")]
    pub item_name: String,
}

/// A premium financing option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Financing {
    pub id: i64,
    #[serde(rename = "aseguradora_id")]
    pub insurer_id: i64,
    #[serde(rename = "nombre_financiera")]
    pub lender_name: String,
    /// Effective monthly rate.
    #[serde(rename = "tasa_efectiva_mensual")]
    pub monthly_rate: f64,
}

/// Templates of an insurer, as returned when templates are included.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Templates {
    #[serde(rename = "deducibles", default)]
    pub deductibles: Vec<Deductible>,
    #[serde(rename = "coberturas", default)]
    pub coverages: Vec<Coverage>,
    #[serde(rename = "financiaciones", default)]
    pub financings: Vec<Financing>,
}

/// An insurance carrier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insurer {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "numeral_asistencia", default)]
    pub assistance_number: Option<String>,
    #[serde(rename = "correo_comercial", default)]
    pub commercial_email: Option<String>,
    #[serde(rename = "correo_reclamaciones", default)]
    pub claims_email: Option<String>,
    #[serde(rename = "oficina_direccion", default)]
    pub office_address: Option<String>,
    #[serde(rename = "contacto_asignado", default)]
    pub assigned_contact: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(rename = "pais_origen_bandera_url", default)]
    pub flag_url: Option<String>,
    #[serde(rename = "respaldo_internacional", default)]
    pub international_backing: Option<String>,
    #[serde(rename = "comisiones_normales", default)]
    pub commissions: Option<Commissions>,
    #[serde(rename = "sobrecomisiones", default)]
    pub over_commissions: Option<Commissions>,
    #[serde(flatten)]
    pub sub_limits: SubLimits,
    /// Only present when templates were requested.
    #[serde(rename = "deducibles", default)]
    pub deductibles: Option<Vec<Deductible>>,
    #[serde(rename = "coberturas", default)]
    pub coverages: Option<Vec<Coverage>>,
    #[serde(rename = "financiaciones", default)]
    pub financings: Option<Vec<Financing>>,
}

impl Insurer {
    /// Commission for a policy type, if set.
    pub fn commission(&self, policy_type: PolicyType) -> Option<f64> {
        self.commissions.as_ref()?.get(&policy_type).copied()
    }

    /// Flatten into a table row.
    ///
    /// Fields keep their wire names; the name is also exposed as
    /// `aseguradora` and commissions as `comision_<tipo>`.
    pub fn to_row(&self) -> Row {
        let mut row = Row::new()
            .set("id", self.id)
            .set("nombre", self.name.as_str())
            .set("aseguradora", self.name.as_str())
            .set("icono", self.logo_url.clone())
            .set("numeral_asistencia", self.assistance_number.clone())
            .set("correo_comercial", self.commercial_email.clone())
            .set("correo_reclamaciones", self.claims_email.clone())
            .set("oficina_direccion", self.office_address.clone())
            .set("contacto_asignado", self.assigned_contact.clone())
            .set("respaldo_internacional", self.international_backing.clone());

        for policy_type in PolicyType::ALL {
            let key = format!("comision_{}", policy_type.as_str().to_lowercase());
            row.insert(key, self.commission(policy_type));
        }
        row
    }
}

impl From<&Insurer> for Row {
    fn from(insurer: &Insurer) -> Self {
        insurer.to_row()
    }
}

/// Body of a create or update request. Unset fields are omitted, so an
/// update only touches what it carries.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InsurerInput {
    #[serde(rename = "nombre", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "numeral_asistencia", skip_serializing_if = "Option::is_none")]
    pub assistance_number: Option<String>,
    #[serde(rename = "correo_comercial", skip_serializing_if = "Option::is_none")]
    pub commercial_email: Option<String>,
    #[serde(rename = "correo_reclamaciones", skip_serializing_if = "Option::is_none")]
    pub claims_email: Option<String>,
    #[serde(rename = "oficina_direccion", skip_serializing_if = "Option::is_none")]
    pub office_address: Option<String>,
    #[serde(rename = "contacto_asignado", skip_serializing_if = "Option::is_none")]
    pub assigned_contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(rename = "pais_origen_bandera_url", skip_serializing_if = "Option::is_none")]
    pub flag_url: Option<String>,
    #[serde(rename = "respaldo_internacional", skip_serializing_if = "Option::is_none")]
    pub international_backing: Option<String>,
    #[serde(rename = "comisiones_normales", skip_serializing_if = "Option::is_none")]
    pub commissions: Option<Commissions>,
    #[serde(rename = "sobrecomisiones", skip_serializing_if = "Option::is_none")]
    pub over_commissions: Option<Commissions>,
    #[serde(flatten)]
    pub sub_limits: SubLimits,
}

impl InsurerInput {
    /// Input for a new insurer. The name is required on create.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

/// Body for creating a deductible template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewDeductible {
    #[serde(rename = "tipo_poliza")]
    pub policy_type: PolicyType,
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "tipo_deducible", skip_serializing_if = "Option::is_none")]
    pub deductible_type: Option<String>,
    #[serde(rename = "valor_porcentaje", skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
    #[serde(rename = "valor_minimo", skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
}

/// Body for creating a coverage template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewCoverage {
    #[serde(rename = "tipo_poliza")]
    pub policy_type: PolicyType,
    #[serde(rename = "tipo_item")]
    pub item_type: CoverageItemType,
    #[serde(rename = "nombre_item")]
    pub item_name: String,
}

/// Body for creating a financing option.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewFinancing {
    #[serde(rename = "nombre_financiera")]
    pub lender_name: String,
    #[serde(rename = "tasa_efectiva_mensual")]
    pub monthly_rate: f64,
}
