pub struct DefaultsConfig {
    pub template: String,
    pub start_temp: f64,
    pub number: usize,
    pub scaling_exponent: f64,
    pub base_name: String,
    pub topology: String,
    pub structure: String,
    pub index: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            template: "templatemdp.txt".to_string(),
            start_temp: 205.0,
            number: 16,
            scaling_exponent: 0.025,
            base_name: "npt".to_string(),
            topology: "../taddol_3htmf_stilbene_em.top".to_string(),
            structure: "../major_endo.gro".to_string(),
            index: "../index.ndx".to_string(),
        }
    }
}
