//! Known city coordinates for protest locations.
//!
//! Protest records carry `x`/`y` map coordinates (latitude, longitude) when
//! their location names a town in this table. Matching is exact first, then
//! case-insensitive; anything else stays without coordinates.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use tracing::debug;

/// A map position: `x` is latitude, `y` is longitude, both in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub x: f64,
    pub y: f64,
}

static CITY_COORDINATES: Lazy<HashMap<&'static str, (f64, f64)>> = Lazy::new(|| {
    HashMap::from([
        ("Beograd", (44.8125, 20.4612)),
        ("Novi Sad", (45.2671, 19.8335)),
        ("Niš", (43.3209, 21.8958)),
        ("Kragujevac", (44.0128, 20.9114)),
        ("Subotica", (46.1005, 19.6650)),
        ("Zrenjanin", (45.3814, 20.3822)),
        ("Pančevo", (44.8708, 20.6403)),
        ("Čačak", (43.8914, 20.3497)),
        ("Kruševac", (43.5800, 21.3339)),
        ("Kraljevo", (43.7256, 20.6887)),
        ("Novi Pazar", (43.1367, 20.5122)),
        ("Smederevo", (44.6640, 20.9274)),
        ("Leskovac", (42.9981, 21.9461)),
        ("Užice", (43.8556, 19.8425)),
        ("Vranje", (42.5514, 21.8997)),
        ("Valjevo", (44.2708, 19.8903)),
        ("Šabac", (44.7545, 19.6936)),
        ("Sombor", (45.7742, 19.1122)),
        ("Požarevac", (44.6178, 21.1872)),
        ("Pirot", (43.1531, 22.5861)),
        ("Zaječar", (43.9142, 22.2842)),
        ("Kikinda", (45.8286, 20.4606)),
        ("Sremska Mitrovica", (44.9744, 19.6114)),
        ("Jagodina", (43.9771, 21.2610)),
        ("Vršac", (45.1214, 21.3019)),
        ("Bor", (44.0749, 22.0959)),
        ("Ruma", (45.0089, 19.8222)),
        ("Bačka Palanka", (45.2517, 19.3878)),
        ("Prokuplje", (43.2342, 21.5878)),
        ("Inđija", (45.0481, 20.0822)),
        ("Lazarevac", (44.3808, 20.2589)),
        ("Aranđelovac", (44.3069, 20.5617)),
        ("Obrenovac", (44.6531, 20.2011)),
        ("Gornji Milanovac", (44.0239, 20.4611)),
        ("Vrbas", (45.5714, 19.6386)),
        ("Bečej", (45.6183, 20.0308)),
        ("Mladenovac", (44.4358, 20.6961)),
        ("Smederevska Palanka", (44.3642, 20.9578)),
        ("Paraćin", (43.8606, 21.4083)),
        ("Temerin", (45.4078, 19.8881)),
        ("Loznica", (44.5333, 19.2236)),
        ("Kula", (45.6108, 19.5256)),
        ("Stara Pazova", (44.9842, 20.1589)),
        ("Knjaževac", (43.5667, 22.2583)),
        ("Surčin", (44.8006, 20.2800)),
        ("Senta", (45.9303, 20.0897)),
        ("Apatin", (45.6717, 18.9822)),
        ("Negotin", (44.2264, 22.5306)),
        ("Futog", (45.2597, 19.7097)),
        ("Veternik", (45.2583, 19.7656)),
        ("Ćuprija", (43.9294, 21.3692)),
        ("Ivanjica", (43.5825, 20.2311)),
        ("Bačka Topola", (45.8153, 19.6303)),
        ("Priboj", (43.5817, 19.5250)),
        ("Požega", (43.8467, 20.0367)),
        ("Žabalj", (45.3711, 20.0586)),
        ("Kuršumlija", (43.1400, 21.2733)),
        ("Srbobran", (45.5489, 19.7983)),
        ("Sjenica", (43.2722, 19.9972)),
        ("Kovin", (44.7472, 20.9769)),
        ("Vlasotince", (42.9608, 22.1275)),
        ("Bujanovac", (42.4617, 21.7683)),
        ("Aleksinac", (43.5403, 21.7058)),
        ("Šid", (45.1250, 19.2275)),
        ("Kanjiža", (46.0672, 20.0500)),
        ("Velika Plana", (44.3356, 21.0783)),
        ("Trstenik", (43.6192, 21.0017)),
        ("Petrovaradin", (45.2472, 19.8764)),
        ("Lebane", (42.9222, 21.7411)),
        ("Odžaci", (45.5075, 19.2583)),
        ("Kovačica", (45.1122, 20.6197)),
        ("Beočin", (45.2464, 19.7228)),
        ("Bela Crkva", (44.8983, 21.4167)),
        ("Ada", (45.7994, 20.1264)),
        ("Novi Kneževac", (46.0492, 20.0906)),
        ("Sremski Karlovci", (45.2039, 19.9328)),
        ("Bajina Bašta", (43.9708, 19.5675)),
        ("Žitište", (45.4867, 20.5489)),
        ("Titel", (45.2050, 20.2925)),
        ("Kladovo", (44.6111, 22.6114)),
        ("Novi Bečej", (45.5994, 20.1314)),
        ("Tutin", (42.9911, 20.3314)),
        ("Plandište", (45.2275, 21.1203)),
        ("Raška", (43.2900, 20.6111)),
        ("Majdanpek", (44.4228, 21.9369)),
        ("Vladičin Han", (42.7086, 22.0608)),
        ("Sokobanja", (43.6444, 21.8722)),
        ("Sečanj", (45.3667, 20.7731)),
        ("Ub", (44.4578, 20.0703)),
        ("Svrljig", (43.4131, 22.1239)),
        ("Crvenka", (45.6917, 19.4656)),
        ("Doljevac", (43.2097, 21.8131)),
        ("Boljevac", (43.8275, 21.9519)),
        ("Lajkovac", (44.3661, 20.1842)),
        ("Bač", (45.3917, 19.2369)),
        ("North Mitrovica", (42.8972, 20.8667)),
        ("Aleksandrovac", (43.4572, 21.0469)),
        ("Vrnjačka Banja", (43.6225, 20.8922)),
        ("Babušnica", (43.0658, 22.4117)),
        ("Krupanj", (44.3667, 19.3611)),
        ("Svilajnac", (44.2322, 21.1964)),
        ("Bela Palanka", (43.2186, 22.3117)),
        ("Brus", (43.3867, 21.0300)),
        ("Dimitrovgrad", (43.0164, 22.7833)),
        ("Čoka", (45.9411, 20.1439)),
        ("Irig", (45.0986, 19.8564)),
        ("Lučani", (43.8650, 20.1361)),
        ("Alibunar", (45.0858, 20.9644)),
        ("Sivac", (45.6986, 19.3786)),
        ("Kosjerić", (43.9950, 19.9119)),
        ("Preševo", (42.3078, 21.6472)),
        ("Palić", (46.1031, 19.7581)),
        ("Nova Varoš", (43.4617, 19.8117)),
        ("Blace", (43.2928, 21.2847)),
        ("Topola", (44.2539, 20.6844)),
        ("Petrovac na Mlavi", (44.3794, 21.4178)),
        ("Batočina", (44.1508, 21.0744)),
        ("Mali Zvornik", (44.3931, 19.1128)),
        ("Vladimirci", (44.6189, 19.7844)),
        ("Žitorađa", (43.1917, 21.7067)),
        ("Despotovac", (44.0917, 21.4375)),
        ("Varvarin", (43.7200, 21.3581)),
        ("Opovo", (45.0536, 20.4281)),
        ("Mionica", (44.2536, 20.0864)),
        ("Koceljeva", (44.4683, 19.8200)),
        ("Čajetina", (43.7514, 19.7133)),
        ("Bajmok", (45.9606, 19.4267)),
        ("Bogatić", (44.8400, 19.4806)),
        ("Lapovo", (44.1833, 21.0958)),
        ("Rača", (44.2311, 20.9789)),
        ("Nova Crnja", (45.6972, 20.5986)),
        ("Medveđa", (42.8306, 21.5781)),
        ("Veliko Gradište", (44.7653, 21.5208)),
        ("Ćićevac", (43.7189, 21.4553)),
        ("Golubac", (44.6553, 21.6306)),
        ("Pećinci", (44.9100, 19.9650)),
        ("Lozovik", (44.4917, 21.0833)),
        ("Banatski Karlovac", (45.0472, 21.0217)),
        ("Mali Iđoš", (45.6900, 19.6761)),
        ("Bosilegrad", (42.4981, 22.4692)),
        ("Ljig", (44.2253, 20.2353)),
        ("Arilje", (43.7539, 20.0958)),
        ("Grocka", (44.6697, 20.7172)),
        ("Žagubica", (44.1933, 21.7883)),
        ("Bavanište", (44.8236, 20.8681)),
        ("Vranjska Banja", (42.5544, 21.9664)),
        ("Rekovac", (43.8706, 21.0911)),
        ("Mol", (45.7619, 20.1314)),
        ("Sopot", (44.5231, 20.5772)),
        ("Malo Crniće", (44.5619, 21.3050)),
        ("Starčevo", (44.8106, 20.6964)),
        ("Kačarevo", (44.9769, 20.7275)),
        ("Kučevo", (44.4797, 21.6711)),
        ("Surdulica", (42.6903, 22.1700)),
        ("Banatsko Novo Selo", (45.0147, 20.7811)),
        ("Žabari", (44.3586, 21.2150)),
        ("Bački Petrovac", (45.3606, 19.5928)),
        ("Gajdobra", (45.3583, 19.2833)),
        ("Padina", (45.1206, 20.7269)),
        ("Klek", (45.3986, 20.4764)),
        ("Ečka", (45.3206, 20.4400)),
        ("Melenci", (45.5178, 20.3194)),
        ("Elemir", (45.4206, 20.3144)),
        ("Aradac", (45.3833, 20.3000)),
        ("Bačko Gradište", (45.5514, 20.0339)),
        ("Ruski Krstur", (45.5619, 19.4161)),
        ("Savino Selo", (45.5067, 19.5417)),
        ("Kucura", (45.5217, 19.5967)),
        ("Ravno Selo", (45.4744, 19.6083)),
        ("Zmajevo", (45.4272, 19.6883)),
        ("Stepanovićevo", (45.4181, 19.7564)),
        ("Kisač", (45.3583, 19.7667)),
        ("Rumenka", (45.2889, 19.7419)),
        ("Kać", (45.3083, 19.9300)),
        ("Budisava", (45.3075, 19.9889)),
        ("Kovilj", (45.2319, 20.0217)),
        ("Mošorin", (45.3039, 20.1833)),
        ("Đurđevo", (45.3389, 20.0833)),
        ("Gospođinci", (45.4272, 19.9753)),
        ("Nadalj", (45.5864, 19.9258)),
        ("Čurug", (45.4711, 20.0681)),
        ("Bački Jarak", (45.3639, 19.8833)),
        ("Sirig", (45.4439, 19.8083)),
        ("Feketić", (45.6056, 19.6083)),
        ("Lovćenac", (45.6583, 19.6250)),
        ("Pačir", (45.9303, 19.5256)),
        ("Stanišić", (45.9075, 19.2864)),
        ("Čonoplja", (45.8556, 19.3083)),
        ("Kljajićevo", (45.8275, 19.4161)),
        ("Bezdan", (45.8453, 18.9278)),
        ("Bački Monoštor", (45.7989, 18.9358)),
        ("Ratkovo", (45.4683, 19.3364)),
        ("Kruščić", (45.6414, 19.4114)),
        ("Mokrin", (45.9361, 20.4150)),
        ("Horgoš", (46.1575, 19.9711)),
    ])
});

/// Look up the coordinates of a known city.
///
/// # Arguments
///
/// * `location` - The protest location as written by the model
///
/// # Returns
///
/// The city's coordinates when `location` (trimmed) names a known city,
/// compared exactly and then case-insensitively; `None` otherwise.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(lookup("Beograd").map(|c| c.x), Some(44.8125));
/// assert_eq!(lookup("Capital City"), None);
/// ```
pub fn lookup(location: &str) -> Option<Coordinates> {
    let location = location.trim();
    let found = CITY_COORDINATES.get(location).copied().or_else(|| {
        let wanted = location.to_lowercase();
        CITY_COORDINATES
            .iter()
            .find(|(name, _)| name.to_lowercase() == wanted)
            .map(|(_, xy)| *xy)
    });
    if found.is_none() {
        debug!(location, "No coordinates known for location");
    }
    found.map(|(x, y)| Coordinates { x, y })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        assert_eq!(
            lookup("Beograd"),
            Some(Coordinates { x: 44.8125, y: 20.4612 })
        );
        assert_eq!(
            lookup("Novi Sad"),
            Some(Coordinates { x: 45.2671, y: 19.8335 })
        );
    }

    #[test]
    fn test_case_insensitive_match() {
        assert_eq!(lookup("ŠABAC"), lookup("Šabac"));
        assert!(lookup("novi pazar").is_some());
        assert!(lookup("  Niš ").is_some());
    }

    #[test]
    fn test_unknown_location() {
        assert_eq!(lookup("Capital City"), None);
        assert_eq!(lookup("unknown"), None);
        assert_eq!(lookup(""), None);
    }

    #[test]
    fn test_table_is_complete() {
        assert_eq!(CITY_COORDINATES.len(), 195);
        assert!(CITY_COORDINATES.values().all(|(x, y)| (42.0..47.0).contains(x) && (18.0..23.0).contains(y)));
    }
}
