mod claim;
mod dentist;
mod diagnosis;
mod patient;
mod procedure;

pub use claim::*;
pub use dentist::*;
pub use diagnosis::*;
pub use patient::*;
pub use procedure::*;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn dentist_dto_uses_portuguese_field_names() {
        let dentist = Dentist {
            id: 1,
            name: "Dr. Silva".into(),
            license_number: "CRO12345".into(),
            active: true,
        };
        let json = serde_json::to_value(DentistDto::from(&dentist)).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["nome"], "Dr. Silva");
        assert_eq!(json["numeroLicenca"], "CRO12345");
        assert_eq!(json["ativo"], true);
    }

    #[test]
    fn patient_dto_deserializes_with_missing_optional_fields() {
        let dto: PatientDto =
            serde_json::from_str(r#"{"nome":"Ana","cpf":"123.456.789-00","idade":30}"#).unwrap();
        assert_eq!(dto.name, "Ana");
        assert_eq!(dto.age, Some(30));
        assert!(dto.id.is_none());
        assert!(dto.dental_plan.is_none());
        assert!(dto.active.is_none());
    }

    #[test]
    fn procedure_dto_parses_calendar_date() {
        let dto: ProcedureDto = serde_json::from_str(
            r#"{"tipoProcedimento":"Limpeza","dataProcedimento":"2024-01-10","custo":150.0,
                "riscoFraude":false,"pacienteId":1,"dentistaId":1}"#,
        )
        .unwrap();
        assert_eq!(dto.date, NaiveDate::from_ymd_opt(2024, 1, 10));
        assert_eq!(dto.cost, Some(150.0));
        assert_eq!(dto.claim_id, None);
    }

    #[test]
    fn fraud_flag_defaults_to_false() {
        let dto: ClaimDto = serde_json::from_str(r#"{"tipoSinistro":"Reembolso"}"#).unwrap();
        assert!(!dto.fraud_risk);
    }

    #[test]
    fn claim_dto_serializes_flattened_keys() {
        let claim = Claim {
            id: 4,
            claim_type: "Reembolso".into(),
            description: None,
            date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            fraud_risk: true,
            procedure_id: 2,
            dentist_id: 3,
            patient_id: 5,
        };
        let json = serde_json::to_value(ClaimDto::from(&claim)).unwrap();
        assert_eq!(json["dataSinistro"], "2024-02-01");
        assert_eq!(json["procedimentoId"], 2);
        assert_eq!(json["dentistaId"], 3);
        assert_eq!(json["pacienteId"], 5);
        assert_eq!(json["riscoFraude"], true);
    }
}
