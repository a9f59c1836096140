//! Province-level region names.
//!
//! Long forms ("广西壮族自治区") collapse to short forms ("广西") so the two
//! lists agree on how a region prefix is written.

/// Long form → short form for every province, municipality, autonomous
/// region and special administrative region.
pub static REGIONS: &[(&str, &str)] = &[
    ("河北省", "河北"),
    ("山西省", "山西"),
    ("辽宁省", "辽宁"),
    ("吉林省", "吉林"),
    ("江苏省", "江苏"),
    ("浙江省", "浙江"),
    ("安徽省", "安徽"),
    ("福建省", "福建"),
    ("江西省", "江西"),
    ("山东省", "山东"),
    ("河南省", "河南"),
    ("湖北省", "湖北"),
    ("湖南省", "湖南"),
    ("广东省", "广东"),
    ("海南省", "海南"),
    ("四川省", "四川"),
    ("贵州省", "贵州"),
    ("云南省", "云南"),
    ("陕西省", "陕西"),
    ("甘肃省", "甘肃"),
    ("青海省", "青海"),
    ("台湾省", "台湾"),
    ("黑龙江省", "黑龙江"),
    ("内蒙古自治区", "内蒙古"),
    ("西藏自治区", "西藏"),
    ("广西壮族自治区", "广西"),
    ("宁夏回族自治区", "宁夏"),
    ("新疆维吾尔自治区", "新疆"),
    ("北京市", "北京"),
    ("天津市", "天津"),
    ("上海市", "上海"),
    ("重庆市", "重庆"),
    ("香港特别行政区", "香港"),
    ("澳门特别行政区", "澳门"),
];

/// Replace every long-form region name in `s` with its short form.
pub fn canonicalize(s: &str, table: &[(&str, &str)]) -> String {
    let mut out = s.to_string();
    for &(long, short) in table {
        if out.contains(long) {
            out = out.replace(long, short);
        }
    }
    out
}

/// Whether any region short form occurs in `fragment`.
pub fn is_region_rooted(fragment: &str, table: &[(&str, &str)]) -> bool {
    table.iter().any(|&(_, short)| fragment.contains(short))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_autonomous_region() {
        assert_eq!(
            canonicalize("广西壮族自治区人民医院", REGIONS),
            "广西人民医院"
        );
    }

    #[test]
    fn collapses_municipality() {
        assert_eq!(canonicalize("上海市第六人民医院", REGIONS), "上海第六人民医院");
    }

    #[test]
    fn leaves_short_forms_alone() {
        assert_eq!(canonicalize("北京协和医院", REGIONS), "北京协和医院");
    }

    #[test]
    fn region_rooted_fragment() {
        assert!(is_region_rooted("四川大学华西医院", REGIONS));
        assert!(!is_region_rooted("东院", REGIONS));
    }
}
