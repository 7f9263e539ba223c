//! Named SQL templates keyed to the GEOROC/ODM2 schema
//!
//! Every read the API performs starts from one of these templates. List
//! templates take filters and pagination through the [`super::QueryBuilder`];
//! by-id templates carry their own `$1` placeholder and are bound directly.
//!
//! Sampling features are discriminated by their `samplingfeaturedescription`
//! into Site / Sample / Batch / Specimen; parent-child linkage goes through
//! `odm2.relatedfeatures` with the 'Is child of' relationship. Hierarchical
//! locations encode their level in the last three digits of
//! `locationhierarchy` (100 = continent, 200 = country, 300 = region).

/// Symbolic names for the read templates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryTemplate {
    Authors,
    AuthorById,
    Citations,
    CitationById,
    Sites,
    SiteById,
    SiteSettings,
    SamplesByGeoSetting,
    GeoJsonSites,
    FullDataByIds,
    Elements,
    ElementTypes,
    Statistics,
}

impl QueryTemplate {
    /// The parameterized SQL for this template
    pub fn sql(&self) -> &'static str {
        match self {
            QueryTemplate::Authors => AUTHORS,
            QueryTemplate::AuthorById => AUTHOR_BY_ID,
            QueryTemplate::Citations => CITATIONS,
            QueryTemplate::CitationById => CITATION_BY_ID,
            QueryTemplate::Sites => SITES,
            QueryTemplate::SiteById => SITE_BY_ID,
            QueryTemplate::SiteSettings => SITE_SETTINGS,
            QueryTemplate::SamplesByGeoSetting => SAMPLES_BY_GEO_SETTING,
            QueryTemplate::GeoJsonSites => GEOJSON_SITES,
            QueryTemplate::FullDataByIds => FULL_DATA_BY_IDS,
            QueryTemplate::Elements => ELEMENTS,
            QueryTemplate::ElementTypes => ELEMENT_TYPES,
            QueryTemplate::Statistics => STATISTICS,
        }
    }
}

/// Column references the builder may interpolate into predicates
///
/// Everything else is rejected before rendering; handler code maps HTTP
/// query parameters onto these aliases.
const FILTER_COLUMNS: &[&str] = &[
    "st.setting",
    "s.latitude",
    "s.longitude",
    "sf.samplingfeatureid",
    "sf.samplingfeaturename",
    "toplevelloc.locationname",
    "secondlevelloc.locationname",
    "thirdlevelloc.locationname",
    "tax_type.taxonomicclassifiername",
    "tax_class.taxonomicclassifiername",
    "tax_min.taxonomicclassifiername",
    "ann_mat.annotationtext",
    "ann_inc.annotationtext",
    "ann_tech.annotationtext",
    "ann_land.annotationtext",
    "var.variablecode",
];

pub fn is_allowed_filter_column(column: &str) -> bool {
    FILTER_COLUMNS.contains(&column)
}

const AUTHORS: &str = "\
SELECT p.personid, p.personfirstname, p.personlastname
FROM odm2.people p
ORDER BY p.personid";

const AUTHOR_BY_ID: &str = "\
SELECT p.personid, p.personfirstname, p.personlastname
FROM odm2.people p
WHERE p.personid = $1";

// Citations with their DOI (external identifier system 1) and authors
// aggregated into one array per citation.
const CITATIONS: &str = "\
SELECT c.citationid,
       c.title,
       c.publisher,
       c.publicationyear,
       c.journal,
       c.volume,
       c.issue,
       c.firstpage,
       c.lastpage,
       c.booktitle,
       c.editors,
       cei.citationexternalidentifier AS doi,
       json_agg(json_build_object(
           'personID', p.personid,
           'firstName', p.personfirstname,
           'lastName', p.personlastname,
           'order', al.authororder
       ) ORDER BY al.authororder) AS authors
FROM odm2.citations c
LEFT JOIN odm2.citationexternalidentifiers cei
       ON cei.citationid = c.citationid
      AND cei.externalidentifiersystemid = 1
LEFT JOIN odm2.authorlists al ON al.citationid = c.citationid
LEFT JOIN odm2.people p ON p.personid = al.personid
GROUP BY c.citationid, cei.citationexternalidentifier";

const CITATION_BY_ID: &str = "\
SELECT c.citationid,
       c.title,
       c.publisher,
       c.publicationyear,
       c.journal,
       c.volume,
       c.issue,
       c.firstpage,
       c.lastpage,
       c.booktitle,
       c.editors,
       cei.citationexternalidentifier AS doi,
       json_agg(json_build_object(
           'personID', p.personid,
           'firstName', p.personfirstname,
           'lastName', p.personlastname,
           'order', al.authororder
       ) ORDER BY al.authororder) AS authors
FROM odm2.citations c
LEFT JOIN odm2.citationexternalidentifiers cei
       ON cei.citationid = c.citationid
      AND cei.externalidentifiersystemid = 1
LEFT JOIN odm2.authorlists al ON al.citationid = c.citationid
LEFT JOIN odm2.people p ON p.personid = al.personid
WHERE c.citationid = $1
GROUP BY c.citationid, cei.citationexternalidentifier";

const SITES: &str = "\
SELECT s.samplingfeatureid,
       s.latitude,
       s.longitude,
       s.spatialreferenceid,
       s.locationprecision,
       s.locationprecisioncomment,
       s.sitedescription,
       s.setting
FROM odm2.sites s
ORDER BY s.samplingfeatureid";

const SITE_BY_ID: &str = "\
SELECT s.samplingfeatureid,
       s.latitude,
       s.longitude,
       s.spatialreferenceid,
       s.locationprecision,
       s.locationprecisioncomment,
       s.sitedescription,
       s.setting
FROM odm2.sites s
WHERE s.samplingfeatureid = $1";

const SITE_SETTINGS: &str = "\
SELECT DISTINCT s.setting
FROM odm2.sites s
WHERE s.setting IS NOT NULL
ORDER BY s.setting";

// Samples joined to their parent site, three-level hierarchical locations,
// taxonomic classifiers (Rock / Lithology / Mineral) and the annotation
// families used by the catalog filters. Optional query parameters add IN
// filters against the aliases below; the GROUP BY tail must stay last.
const SAMPLES_BY_GEO_SETTING: &str = "\
SELECT sf.samplingfeatureid,
       sf.samplingfeatureuuid,
       sf.samplingfeaturename,
       sf.samplingfeaturedescription,
       sf.featuregeometrywkt,
       sf.elevation_m,
       sf.elevationprecision,
       st.setting,
       array_agg(DISTINCT toplevelloc.locationname) AS location_names1,
       array_agg(DISTINCT secondlevelloc.locationname) AS location_names2,
       array_agg(DISTINCT thirdlevelloc.locationname) AS location_names3,
       array_agg(DISTINCT tax_type.taxonomicclassifiername) AS rock_types,
       array_agg(DISTINCT tax_class.taxonomicclassifiername) AS rock_classes,
       array_agg(DISTINCT tax_min.taxonomicclassifiername) AS minerals,
       array_agg(DISTINCT ann_mat.annotationtext) AS materials,
       array_agg(DISTINCT ann_inc.annotationtext) AS inclusion_types,
       array_agg(DISTINCT ann_tech.annotationtext) AS sampling_techniques,
       array_agg(DISTINCT ann_rim.annotationtext) AS rim_or_core
FROM odm2.samplingfeatures sf
JOIN odm2.relatedfeatures rf
  ON rf.samplingfeatureid = sf.samplingfeatureid
 AND rf.relationshiptypecv = 'Is child of'
JOIN odm2.sites st ON st.samplingfeatureid = rf.relatedfeatureid
LEFT JOIN (
    SELECT sl.samplingfeatureid, l.locationname
    FROM odm2.sitelocations sl
    JOIN odm2.locations l ON l.locationid = sl.locationid
    WHERE right(sl.locationhierarchy::varchar, 3) = '100'
) toplevelloc ON toplevelloc.samplingfeatureid = st.samplingfeatureid
LEFT JOIN (
    SELECT sl.samplingfeatureid, l.locationname
    FROM odm2.sitelocations sl
    JOIN odm2.locations l ON l.locationid = sl.locationid
    WHERE right(sl.locationhierarchy::varchar, 3) = '200'
) secondlevelloc ON secondlevelloc.samplingfeatureid = st.samplingfeatureid
LEFT JOIN (
    SELECT sl.samplingfeatureid, l.locationname
    FROM odm2.sitelocations sl
    JOIN odm2.locations l ON l.locationid = sl.locationid
    WHERE right(sl.locationhierarchy::varchar, 3) = '300'
) thirdlevelloc ON thirdlevelloc.samplingfeatureid = st.samplingfeatureid
LEFT JOIN odm2.relatedfeatures rfspec
  ON rfspec.relatedfeatureid = sf.samplingfeatureid
 AND rfspec.relationshiptypecv = 'Is child of'
LEFT JOIN odm2.specimens spec ON spec.samplingfeatureid = rfspec.samplingfeatureid
LEFT JOIN (
    SELECT stc.samplingfeatureid, tc.taxonomicclassifiername
    FROM odm2.specimentaxonomicclassifiers stc
    JOIN odm2.taxonomicclassifiers tc
      ON tc.taxonomicclassifierid = stc.taxonomicclassifierid
    WHERE tc.taxonomicclassifiertypecv = 'Rock'
) tax_type ON tax_type.samplingfeatureid = spec.samplingfeatureid
LEFT JOIN (
    SELECT stc.samplingfeatureid, tc.taxonomicclassifiername
    FROM odm2.specimentaxonomicclassifiers stc
    JOIN odm2.taxonomicclassifiers tc
      ON tc.taxonomicclassifierid = stc.taxonomicclassifierid
    WHERE tc.taxonomicclassifiertypecv = 'Lithology'
) tax_class ON tax_class.samplingfeatureid = spec.samplingfeatureid
LEFT JOIN (
    SELECT stc.samplingfeatureid, tc.taxonomicclassifiername
    FROM odm2.specimentaxonomicclassifiers stc
    JOIN odm2.taxonomicclassifiers tc
      ON tc.taxonomicclassifierid = stc.taxonomicclassifierid
    WHERE tc.taxonomicclassifiertypecv = 'Mineral'
) tax_min ON tax_min.samplingfeatureid = spec.samplingfeatureid
LEFT JOIN (
    SELECT sa.samplingfeatureid, a.annotationtext
    FROM odm2.samplingfeatureannotations sa
    JOIN odm2.annotations a ON a.annotationid = sa.annotationid
    WHERE a.annotationcode = 'g_batches_material'
) ann_mat ON ann_mat.samplingfeatureid = spec.samplingfeatureid
LEFT JOIN (
    SELECT sa.samplingfeatureid, a.annotationtext
    FROM odm2.samplingfeatureannotations sa
    JOIN odm2.annotations a ON a.annotationid = sa.annotationid
    WHERE a.annotationcode = 'g_inclusions_inclusion_type'
) ann_inc ON ann_inc.samplingfeatureid = spec.samplingfeatureid
LEFT JOIN (
    SELECT sa.samplingfeatureid, a.annotationtext
    FROM odm2.samplingfeatureannotations sa
    JOIN odm2.annotations a ON a.annotationid = sa.annotationid
    WHERE a.annotationcode = 'g_samples_sampling_technique'
) ann_tech ON ann_tech.samplingfeatureid = sf.samplingfeatureid
LEFT JOIN (
    SELECT sa.samplingfeatureid, a.annotationtext
    FROM odm2.samplingfeatureannotations sa
    JOIN odm2.annotations a ON a.annotationid = sa.annotationid
    WHERE a.annotationcode = 'g_samples_land_or_sea'
) ann_land ON ann_land.samplingfeatureid = sf.samplingfeatureid
LEFT JOIN (
    SELECT sa.samplingfeatureid, a.annotationtext
    FROM odm2.samplingfeatureannotations sa
    JOIN odm2.annotations a ON a.annotationid = sa.annotationid
    WHERE a.annotationcode = 'g_inclusions_rim_or_core'
) ann_rim ON ann_rim.samplingfeatureid = spec.samplingfeatureid
LEFT JOIN (
    SELECT rfb.relatedfeatureid AS sampleid, v.variablecode
    FROM odm2.relatedfeatures rfb
    JOIN odm2.featureactions fa ON fa.samplingfeatureid = rfb.samplingfeatureid
    JOIN odm2.results r ON r.featureactionid = fa.featureactionid
    JOIN odm2.variables v ON v.variableid = r.variableid
    WHERE rfb.relationshiptypecv = 'Is child of'
) var ON var.sampleid = sf.samplingfeatureid
GROUP BY sf.samplingfeatureid,
         sf.samplingfeatureuuid,
         sf.samplingfeaturename,
         sf.samplingfeaturedescription,
         sf.featuregeometrywkt,
         sf.elevation_m,
         sf.elevationprecision,
         st.setting";

// Sites grouped by coordinate pair for the GeoJSON feature collection.
const GEOJSON_SITES: &str = "\
SELECT s.latitude,
       s.longitude,
       array_agg(DISTINCT s.samplingfeatureid) AS sampling_feature_ids,
       array_agg(DISTINCT s.setting) AS settings,
       array_agg(DISTINCT toplevelloc.locationname) AS location_names1,
       array_agg(DISTINCT secondlevelloc.locationname) AS location_names2,
       array_agg(DISTINCT thirdlevelloc.locationname) AS location_names3
FROM odm2.sites s
LEFT JOIN (
    SELECT sl.samplingfeatureid, l.locationname
    FROM odm2.sitelocations sl
    JOIN odm2.locations l ON l.locationid = sl.locationid
    WHERE right(sl.locationhierarchy::varchar, 3) = '100'
) toplevelloc ON toplevelloc.samplingfeatureid = s.samplingfeatureid
LEFT JOIN (
    SELECT sl.samplingfeatureid, l.locationname
    FROM odm2.sitelocations sl
    JOIN odm2.locations l ON l.locationid = sl.locationid
    WHERE right(sl.locationhierarchy::varchar, 3) = '200'
) secondlevelloc ON secondlevelloc.samplingfeatureid = s.samplingfeatureid
LEFT JOIN (
    SELECT sl.samplingfeatureid, l.locationname
    FROM odm2.sitelocations sl
    JOIN odm2.locations l ON l.locationid = sl.locationid
    WHERE right(sl.locationhierarchy::varchar, 3) = '300'
) thirdlevelloc ON thirdlevelloc.samplingfeatureid = s.samplingfeatureid
GROUP BY s.latitude, s.longitude";

// The denormalization query: one row per requested sample, every
// one-to-many joined relation collapsed into an array. Aliases are quoted
// so row_to_json emits the exact field names the projection expects.
const FULL_DATA_BY_IDS: &str = r#"
WITH batches AS (
    SELECT rf.relatedfeatureid AS sampleid,
           array_agg(rf.samplingfeatureid ORDER BY rf.samplingfeatureid) AS batch_ids,
           array_agg(bsf.samplingfeaturename ORDER BY rf.samplingfeatureid) AS batch_names
    FROM odm2.relatedfeatures rf
    JOIN odm2.samplingfeatures bsf ON bsf.samplingfeatureid = rf.samplingfeatureid
    WHERE rf.relationshiptypecv = 'Is child of'
    GROUP BY rf.relatedfeatureid
),
refs AS (
    SELECT fa.samplingfeatureid AS sampleid,
           json_agg(DISTINCT jsonb_build_object(
               'citationID', c.citationid,
               'title', c.title,
               'journal', c.journal,
               'year', c.publicationyear,
               'pages', c.firstpage || '-' || c.lastpage,
               'doi', cei.citationexternalidentifier,
               'authors', (
                   SELECT json_agg(json_build_object(
                       'personID', p.personid,
                       'firstName', p.personfirstname,
                       'lastName', p.personlastname,
                       'order', al.authororder
                   ) ORDER BY al.authororder)
                   FROM odm2.authorlists al
                   JOIN odm2.people p ON p.personid = al.personid
                   WHERE al.citationid = c.citationid
               )
           )) AS reference_list
    FROM odm2.featureactions fa
    JOIN odm2.actionannotations aa ON aa.actionid = fa.actionid
    JOIN odm2.annotations an ON an.annotationid = aa.annotationid
    JOIN odm2.citations c ON c.citationid = an.citationid
    LEFT JOIN odm2.citationexternalidentifiers cei
           ON cei.citationid = c.citationid
          AND cei.externalidentifiersystemid = 1
    GROUP BY fa.samplingfeatureid
),
locs AS (
    SELECT sl.samplingfeatureid AS siteid,
           array_agg(l.locationname ORDER BY sl.locationhierarchy) AS names,
           array_agg(l.locationtypecv ORDER BY sl.locationhierarchy) AS types
    FROM odm2.sitelocations sl
    JOIN odm2.locations l ON l.locationid = sl.locationid
    GROUP BY sl.samplingfeatureid
),
methods AS (
    SELECT fa.samplingfeatureid AS sampleid,
           array_agg(m.methodcode ORDER BY a.actionid) AS codes,
           array_agg(m.methoddescription ORDER BY a.actionid) AS descriptions,
           array_agg(o.organizationname ORDER BY a.actionid) AS organizations
    FROM odm2.featureactions fa
    JOIN odm2.actions a ON a.actionid = fa.actionid
    JOIN odm2.methods m ON m.methodid = a.methodid
    LEFT JOIN odm2.organizations o ON o.organizationid = m.organizationid
    GROUP BY fa.samplingfeatureid
),
batch_results AS (
    SELECT rf.relatedfeatureid AS sampleid,
           rf.samplingfeatureid AS batchid,
           array_agg(v.variablecode ORDER BY r.resultid) AS item_names,
           array_agg(v.variabletypecode ORDER BY r.resultid) AS item_groups,
           array_agg(mv.datavalue ORDER BY r.resultid) AS data_values,
           array_agg(u.unitsabbreviation ORDER BY r.resultid) AS unit_names,
           array_agg(std.standardname ORDER BY r.resultid) AS standard_names,
           array_agg(std.standardvalue ORDER BY r.resultid) AS standard_values
    FROM odm2.relatedfeatures rf
    JOIN odm2.featureactions fa ON fa.samplingfeatureid = rf.samplingfeatureid
    JOIN odm2.results r ON r.featureactionid = fa.featureactionid
    JOIN odm2.variables v ON v.variableid = r.variableid
    JOIN odm2.units u ON u.unitsid = r.unitsid
    JOIN odm2.measurementresults mr ON mr.resultid = r.resultid
    JOIN odm2.measurementresultvalues mv ON mv.resultid = mr.resultid
    LEFT JOIN odm2.resultsstandards std ON std.resultid = r.resultid
    WHERE rf.relationshiptypecv = 'Is child of'
    GROUP BY rf.relatedfeatureid, rf.samplingfeatureid
),
results AS (
    SELECT br.sampleid,
           json_agg(br.item_names ORDER BY br.batchid) AS item_names,
           json_agg(br.item_groups ORDER BY br.batchid) AS item_groups,
           json_agg(br.data_values ORDER BY br.batchid) AS data_values,
           json_agg(br.unit_names ORDER BY br.batchid) AS unit_names,
           json_agg(br.standard_names ORDER BY br.batchid) AS standard_names,
           json_agg(br.standard_values ORDER BY br.batchid) AS standard_values
    FROM batch_results br
    GROUP BY br.sampleid
)
SELECT sf.samplingfeatureid                         AS "sampleNum",
       sf.samplingfeatureuuid                       AS "uniqueID",
       COALESCE(b.batch_ids, '{}')                  AS "batches",
       COALESCE(b.batch_names, '{}')                AS "sampleIDs",
       COALESCE(r.reference_list, '[]')             AS "references",
       COALESCE(lo.names, '{}')                     AS "locationNames",
       COALESCE(lo.types, '{}')                     AS "locationTypes",
       (
           SELECT json_agg(json_build_object(
               'latitude', s2.latitude,
               'longitude', s2.longitude,
               'setting', s2.setting,
               'locationPrecision', s2.locationprecision,
               'locationPrecisionComment', s2.locationprecisioncomment
           ))
           FROM odm2.sites s2
           WHERE s2.samplingfeatureid = rfsite.relatedfeatureid
       )                                            AS "locData",
       st.elevationprecisioncomment                 AS "elevationPrecisionComment",
       st.locationprecisioncomment                  AS "locationPrecisionComment",
       st.latitude                                  AS "latitude",
       st.longitude                                 AS "longitude",
       st.setting                                   AS "tectonicSetting",
       ann_land.annotationtext                      AS "landOrSea",
       ARRAY(SELECT tc.taxonomicclassifiername
             FROM odm2.relatedfeatures rfs
             JOIN odm2.specimentaxonomicclassifiers stc
               ON stc.samplingfeatureid = rfs.samplingfeatureid
             JOIN odm2.taxonomicclassifiers tc
               ON tc.taxonomicclassifierid = stc.taxonomicclassifierid
             WHERE rfs.relatedfeatureid = sf.samplingfeatureid
               AND tc.taxonomicclassifiertypecv = 'Rock')      AS "rockTypes",
       ARRAY(SELECT tc.taxonomicclassifiername
             FROM odm2.relatedfeatures rfs
             JOIN odm2.specimentaxonomicclassifiers stc
               ON stc.samplingfeatureid = rfs.samplingfeatureid
             JOIN odm2.taxonomicclassifiers tc
               ON tc.taxonomicclassifierid = stc.taxonomicclassifierid
             WHERE rfs.relatedfeatureid = sf.samplingfeatureid
               AND tc.taxonomicclassifiertypecv = 'Lithology') AS "rockClasses",
       ARRAY(SELECT a.annotationtext
             FROM odm2.samplingfeatureannotations sa
             JOIN odm2.annotations a ON a.annotationid = sa.annotationid
             WHERE sa.samplingfeatureid = sf.samplingfeatureid
               AND a.annotationcode = 'g_samples_rock_texture') AS "rockTextures",
       spec.mineralagemin                           AS "ageMin",
       spec.mineralagemax                           AS "ageMax",
       spec.geolage                                 AS "geologicalAge",
       ARRAY(SELECT a.annotationtext
             FROM odm2.relatedfeatures rfs
             JOIN odm2.samplingfeatureannotations sa
               ON sa.samplingfeatureid = rfs.samplingfeatureid
             JOIN odm2.annotations a ON a.annotationid = sa.annotationid
             WHERE rfs.relatedfeatureid = sf.samplingfeatureid
               AND a.annotationcode = 'g_batches_material')     AS "materials",
       ARRAY(SELECT tc.taxonomicclassifiername
             FROM odm2.relatedfeatures rfs
             JOIN odm2.specimentaxonomicclassifiers stc
               ON stc.samplingfeatureid = rfs.samplingfeatureid
             JOIN odm2.taxonomicclassifiers tc
               ON tc.taxonomicclassifierid = stc.taxonomicclassifierid
             WHERE rfs.relatedfeatureid = sf.samplingfeatureid
               AND tc.taxonomicclassifiertypecv = 'Mineral')   AS "minerals",
       ARRAY(SELECT a.annotationtext
             FROM odm2.relatedfeatures rfs
             JOIN odm2.samplingfeatureannotations sa
               ON sa.samplingfeatureid = rfs.samplingfeatureid
             JOIN odm2.annotations a ON a.annotationid = sa.annotationid
             WHERE rfs.relatedfeatureid = sf.samplingfeatureid
               AND a.annotationcode = 'g_inclusions_inclusion_type') AS "inclusionTypes",
       ARRAY(SELECT a.annotationtext
             FROM odm2.samplingfeatureannotations sa
             JOIN odm2.annotations a ON a.annotationid = sa.annotationid
             WHERE sa.samplingfeatureid = sf.samplingfeatureid
               AND a.annotationcode = 'g_samples_sampling_technique') AS "samplingTechniques",
       spec.drilldepthmin                           AS "drillDepthMin",
       spec.drilldepthmax                           AS "drillDepthMax",
       COALESCE(m.codes, '{}')                      AS "methods",
       COALESCE(m.descriptions, '{}')               AS "methodComments",
       COALESCE(m.organizations, '{}')              AS "institutions",
       COALESCE(res.item_names, '[]')               AS "itemName",
       COALESCE(res.item_groups, '[]')              AS "itemGroup",
       COALESCE(res.data_values, '[]')              AS "values",
       COALESCE(res.unit_names, '[]')               AS "units",
       COALESCE(res.standard_names, '[]')           AS "standardNames",
       COALESCE(res.standard_values, '[]')          AS "standardValues"
FROM odm2.samplingfeatures sf
LEFT JOIN batches b ON b.sampleid = sf.samplingfeatureid
LEFT JOIN refs r ON r.sampleid = sf.samplingfeatureid
LEFT JOIN odm2.relatedfeatures rfsite
       ON rfsite.samplingfeatureid = sf.samplingfeatureid
      AND rfsite.relationshiptypecv = 'Is child of'
LEFT JOIN odm2.sites st ON st.samplingfeatureid = rfsite.relatedfeatureid
LEFT JOIN locs lo ON lo.siteid = rfsite.relatedfeatureid
LEFT JOIN odm2.specimens spec ON spec.samplingfeatureid = sf.samplingfeatureid
LEFT JOIN (
    SELECT sa.samplingfeatureid, a.annotationtext
    FROM odm2.samplingfeatureannotations sa
    JOIN odm2.annotations a ON a.annotationid = sa.annotationid
    WHERE a.annotationcode = 'g_samples_land_or_sea'
) ann_land ON ann_land.samplingfeatureid = sf.samplingfeatureid
LEFT JOIN methods m ON m.sampleid = sf.samplingfeatureid
LEFT JOIN results res ON res.sampleid = sf.samplingfeatureid
WHERE sf.samplingfeatureid = ANY($1)
ORDER BY sf.samplingfeatureid"#;

const ELEMENTS: &str = "\
SELECT v.variablecode
FROM odm2.variables v
ORDER BY v.variablecode";

const ELEMENT_TYPES: &str = "\
SELECT DISTINCT v.variabletypecode
FROM odm2.variables v
ORDER BY v.variabletypecode";

const STATISTICS: &str = "\
SELECT (SELECT count(*) FROM odm2.citations) AS citations,
       (SELECT count(*) FROM odm2.specimens) AS samples,
       (SELECT count(*) FROM odm2.actions
         WHERE actiontypecv = 'Specimen analysis') AS analyses,
       (SELECT count(*) FROM odm2.measurementresultvalues) AS results";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_id_templates_carry_placeholder() {
        for t in [
            QueryTemplate::AuthorById,
            QueryTemplate::CitationById,
            QueryTemplate::SiteById,
            QueryTemplate::FullDataByIds,
        ] {
            assert!(t.sql().contains("$1"), "{:?} has no placeholder", t);
        }
    }

    #[test]
    fn test_list_templates_have_no_placeholders() {
        for t in [
            QueryTemplate::Authors,
            QueryTemplate::Citations,
            QueryTemplate::Sites,
            QueryTemplate::SamplesByGeoSetting,
            QueryTemplate::GeoJsonSites,
            QueryTemplate::Statistics,
        ] {
            assert!(!t.sql().contains('$'), "{:?} carries a placeholder", t);
        }
    }

    #[test]
    fn test_doi_join_restricted_to_system_1() {
        assert!(QueryTemplate::Citations
            .sql()
            .contains("externalidentifiersystemid = 1"));
    }

    #[test]
    fn test_samples_template_groups_at_the_tail() {
        let sql = QueryTemplate::SamplesByGeoSetting.sql();
        let tail = sql.to_lowercase().rfind("group by").unwrap();
        // Nothing but the grouping columns after the tail
        assert!(!sql[tail..].to_lowercase().contains("select"));
    }

    #[test]
    fn test_filter_allow_list() {
        assert!(is_allowed_filter_column("tax_type.taxonomicclassifiername"));
        assert!(is_allowed_filter_column("st.setting"));
        assert!(!is_allowed_filter_column("pg_catalog.pg_tables"));
        assert!(!is_allowed_filter_column("setting; DROP TABLE odm2.sites"));
    }

    #[test]
    fn test_location_levels_partition_on_hierarchy_suffix() {
        for sql in [
            QueryTemplate::SamplesByGeoSetting.sql(),
            QueryTemplate::GeoJsonSites.sql(),
        ] {
            for suffix in ["'100'", "'200'", "'300'"] {
                assert!(sql.contains(suffix), "missing level suffix {}", suffix);
            }
        }
    }
}
